//! Role router: path → layout, required role and page

mod navigator;
mod table;

pub use navigator::{Navigation, Navigator, Page};
pub use table::{
    standard_routes, DataSource, Layout, PageRoute, RouteGroup, RouteMatch, RouteTable, LOGIN_PATH,
};
