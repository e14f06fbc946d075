pub mod indexing_data_route;
pub mod indexing_request;
pub mod indexing_response;
