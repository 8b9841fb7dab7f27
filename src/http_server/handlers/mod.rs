mod app_info;
mod not_found;

pub use app_info::app_info_handler;
pub use not_found::not_found_handler;
