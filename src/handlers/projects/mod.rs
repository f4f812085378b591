mod create;
mod delete;
mod list;
mod update;

pub use create::create_project;
pub use delete::delete_project;
pub use list::list_projects;
pub use update::update_project;
