pub mod dispatch;
pub mod garage;
pub mod onboarding;
