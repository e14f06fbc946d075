pub mod collection_request;
pub mod create_collection_route;
pub mod delete_collection_route;
