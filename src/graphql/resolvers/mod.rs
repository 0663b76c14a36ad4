pub mod transaction;

pub use transaction::{TransactionMutation, TransactionObject, TransactionQuery, TransactionsInput};

use async_graphql::MergedObject;

#[derive(MergedObject, Default)]
pub struct Query(TransactionQuery);

pub mod mutation {
    use async_graphql::MergedObject;
    use super::transaction::TransactionMutation;

    #[derive(MergedObject, Default)]
    pub struct Mutation(TransactionMutation);
}

pub use mutation::Mutation;
