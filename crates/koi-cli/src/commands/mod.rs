pub mod customize;
pub mod data;
pub mod mood;
pub mod onboarding;
pub mod prefs;
pub mod session;
pub mod streak;
pub mod theme;
