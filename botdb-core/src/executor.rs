use crate::{
    Driver, Query, QueryResult, Result, RowLabeled, RowsAffected,
    stream::{Stream, StreamExt, TryStreamExt},
};
use std::future::{self, Future};

pub trait Executor: Send + Sized {
    type Driver: Driver;

    /// Executor returned by [`exclusive`](Self::exclusive).
    type Exclusive<'e>: Executor<Driver = Self::Driver>
    where
        Self: 'e;

    fn driver(&self) -> &Self::Driver;

    /// Sole use of the underlying connection until the returned executor is
    /// dropped, statements issued through other handles wait for it.
    fn exclusive(&mut self) -> impl Future<Output = Self::Exclusive<'_>> + Send;

    fn prepare(
        &mut self,
        query: String,
    ) -> impl Future<Output = Result<Query<Self::Driver>>> + Send;

    /// General method to send any query and return any result type (either row or count)
    fn run<'s>(
        &'s mut self,
        query: &'s mut Query<Self::Driver>,
    ) -> impl Stream<Item = Result<QueryResult>> + Send + 's;

    /// Execute the query and returns the rows.
    fn fetch<'s>(
        &'s mut self,
        query: &'s mut Query<Self::Driver>,
    ) -> impl Stream<Item = Result<RowLabeled>> + Send + 's {
        self.run(query).filter_map(|v| async move {
            match v {
                Ok(QueryResult::Row(v)) => Some(Ok(v)),
                Err(e) => Some(Err(e)),
                _ => None,
            }
        })
    }

    /// Execute the query and return the total number of rows affected.
    fn execute<'s>(
        &'s mut self,
        query: &'s mut Query<Self::Driver>,
    ) -> impl Future<Output = Result<RowsAffected>> + Send + 's {
        self.run(query)
            .filter_map(|v| async move {
                match v {
                    Ok(QueryResult::Affected(v)) => Some(Ok(v)),
                    Err(e) => Some(Err(e)),
                    _ => None,
                }
            })
            .try_collect()
    }
}

impl<E: Executor> Executor for &mut E {
    type Driver = E::Driver;
    type Exclusive<'e>
        = &'e mut Self
    where
        Self: 'e;

    fn driver(&self) -> &Self::Driver {
        (**self).driver()
    }

    fn exclusive(&mut self) -> impl Future<Output = Self::Exclusive<'_>> + Send {
        future::ready(self)
    }

    fn prepare(
        &mut self,
        query: String,
    ) -> impl Future<Output = Result<Query<Self::Driver>>> + Send {
        (**self).prepare(query)
    }

    fn run<'s>(
        &'s mut self,
        query: &'s mut Query<Self::Driver>,
    ) -> impl Stream<Item = Result<QueryResult>> + Send + 's {
        (**self).run(query)
    }
}
