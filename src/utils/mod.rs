pub mod testing_utils;
