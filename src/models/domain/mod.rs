pub mod assessment;
pub mod question;
pub mod student;
pub mod submission;
pub mod user;
pub use assessment::Assessment;
pub use question::{Question, QuestionType};
pub use student::Student;
pub use submission::{Answer, Submission};
pub use user::{User, UserRole};
