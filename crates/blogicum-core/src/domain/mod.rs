//! Domain entities - the core business objects.

mod category;
mod comment;
mod location;
mod page;
mod post;
mod user;
mod validation;
mod visibility;

pub use category::Category;
pub use comment::{Comment, CommentDraft, CommentView};
pub use location::Location;
pub use page::{DEFAULT_PER_PAGE, Page, PageRequest};
pub use post::{Post, PostDetail, PostDraft, PostSummary, TITLE_MAX_LEN};
pub use user::{
    PASSWORD_MIN_LEN, PasswordChange, ProfileChanges, Registration, USERNAME_MAX_LEN, User,
};
pub use validation::ValidationErrors;
pub use visibility::{PostQuery, is_publicly_visible, is_visible_to};
