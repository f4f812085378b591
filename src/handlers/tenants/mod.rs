mod list;
mod registry;
mod settings;
mod show;
mod update;

pub use list::list_tenants;
pub use registry::tenant_registry;
pub use settings::{delete_tenant, rename_tenant};
pub use show::show_tenant;
pub use update::update_tenant;
