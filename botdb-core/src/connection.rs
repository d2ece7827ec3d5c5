use crate::{
    Executor, Query, QueryResult, Result,
    stream::{Stream, StreamExt},
};
use async_stream::try_stream;
use std::{
    borrow::Cow,
    future::{self, Future},
    pin::pin,
    sync::Arc,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

pub trait Connection: Executor {
    /// Open a connection to the given URL, the scheme must match [`Driver::NAME`](crate::Driver::NAME).
    fn connect(url: Cow<'static, str>) -> impl Future<Output = Result<Self>> + Send;

    /// Wrap the connection into a cloneable handle serializing the statements.
    fn shared(self) -> SharedConnection<Self> {
        SharedConnection::new(self)
    }
}

/// Cloneable handle to a single connection.
///
/// Statements issued through any clone run one at a time, in the order they
/// acquire the connection. A sequence of statements that must not interleave
/// with other tasks (a transaction) runs on the guard returned by [`lock`](Self::lock),
/// which is also what [`Executor::exclusive`] returns.
pub struct SharedConnection<C: Connection> {
    connection: Arc<Mutex<C>>,
    driver: C::Driver,
}

impl<C: Connection> SharedConnection<C> {
    pub fn new(connection: C) -> Self {
        Self {
            connection: Arc::new(Mutex::new(connection)),
            driver: Default::default(),
        }
    }

    /// Exclusive access to the connection until the guard is dropped.
    pub async fn lock(&self) -> OwnedMutexGuard<C> {
        self.connection.clone().lock_owned().await
    }
}

impl<C: Connection> Clone for SharedConnection<C> {
    fn clone(&self) -> Self {
        Self {
            connection: self.connection.clone(),
            driver: Default::default(),
        }
    }
}

impl<C: Connection> Executor for SharedConnection<C> {
    type Driver = C::Driver;
    type Exclusive<'e>
        = OwnedMutexGuard<C>
    where
        Self: 'e;

    fn driver(&self) -> &Self::Driver {
        &self.driver
    }

    fn exclusive(&mut self) -> impl Future<Output = Self::Exclusive<'_>> + Send {
        self.connection.clone().lock_owned()
    }

    fn prepare(
        &mut self,
        query: String,
    ) -> impl Future<Output = Result<Query<Self::Driver>>> + Send {
        let connection = self.connection.clone();
        async move { connection.lock().await.prepare(query).await }
    }

    fn run<'s>(
        &'s mut self,
        query: &'s mut Query<Self::Driver>,
    ) -> impl Stream<Item = Result<QueryResult>> + Send + 's {
        let connection = self.connection.clone();
        try_stream! {
            let mut connection = connection.lock().await;
            let mut stream = pin!(connection.run(query));
            while let Some(value) = stream.next().await {
                yield value?;
            }
        }
    }
}

impl<C: Connection> Executor for OwnedMutexGuard<C> {
    type Driver = C::Driver;
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
