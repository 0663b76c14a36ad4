use async_graphql::{EmptySubscription, Schema};
use crate::graphql::resolvers::{Query, Mutation};
use crate::services::TransactionWorkflow;

pub type AppSchema = Schema<Query, Mutation, EmptySubscription>;

pub fn build_schema(workflow: TransactionWorkflow) -> AppSchema {
    Schema::build(
        Query::default(),
        Mutation::default(),
        EmptySubscription,
    )
    .data(workflow)
    .finish()
}
