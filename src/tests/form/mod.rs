mod navigation_tests;
mod session_tests;
