pub mod category_service;
pub mod flashcard_service;
pub mod onboarding_service;
pub mod profile_service;
pub mod sample_thought_service;
