mod appointments_test;
mod blocks_test;
mod directory_test;
mod middleware_test;
