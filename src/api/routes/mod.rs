pub mod cache;
pub mod faqs;
pub mod health;
pub mod languages;
