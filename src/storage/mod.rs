pub mod question;
pub mod session;

pub use question::{QuestionBank, QuizQuestion};
pub use session::{SessionSlot, SessionStore, SlotGuard};
