pub mod set_stress_tests;
