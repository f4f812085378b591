mod create;
mod delete;
mod list;
mod update;

pub use create::add_user;
pub use delete::delete_user;
pub use list::list_users;
pub use update::update_user;
