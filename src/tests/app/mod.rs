mod key_flow_tests;
