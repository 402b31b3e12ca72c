mod service_test_tests;
