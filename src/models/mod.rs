pub mod favorite;
pub mod post;
pub mod user;

pub use favorite::Favorite;
pub use post::{generate_post_id, Comment, NewComment, NewPost, Post};
pub use user::{NewUser, User};
