pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use router::init_free_questions_router;
pub use service::FreeQuestionService;
