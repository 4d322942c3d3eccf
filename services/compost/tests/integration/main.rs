mod bin_test;
mod forum_test;
mod profile_test;
mod router_test;
