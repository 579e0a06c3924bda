/// Command and text message handlers
pub mod handlers;
/// Static texts and keyboards
pub mod views;
