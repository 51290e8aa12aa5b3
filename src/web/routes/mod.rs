pub mod category_routes;
pub mod deck_routes;
pub mod flashcard_routes;
pub mod onboarding_routes;
pub mod profile_routes;
