pub mod add_point_route;
pub mod delete_point_route;
pub mod edit_point_route;
pub mod point_request;
pub mod point_response;
