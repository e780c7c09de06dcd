pub use edugate_models::free_questions::*;
