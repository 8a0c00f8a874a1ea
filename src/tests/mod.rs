mod derivative_tests;
