pub mod feed_item;
pub mod ledger;
pub mod topic;
