mod dataset;
mod expression;
mod insert;
mod query;
mod test_utils;
