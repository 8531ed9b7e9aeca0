//! Single-writer actor for SQLite.
//!
//! SQLite allows one writer at a time. All mutations are funneled through a
//! dedicated actor task that owns one pooled connection and runs each job
//! inside an immediate transaction, serializing writes without lock
//! contention between concurrent client pipelines.

use super::DbPool;
use crate::errors::StorageError;
use diesel::SqliteConnection;
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

use folionav_core::errors::Result;

// A write job: runs against the actor's connection, inside a transaction.
// The return type is erased so one channel carries jobs of any shape.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

type ErasedJob = Job<Box<dyn Any + Send + 'static>>;
type Reply = oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>;

/// Cloneable handle for submitting write jobs to the actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(ErasedJob, Reply)>,
}

impl WriteHandle {
    /// Runs `job` on the writer's connection inside an immediate
    /// transaction and returns its result.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .expect("writer actor channel closed");

        ret_rx
            .await
            .expect("writer actor dropped the reply sender")
            .map(|boxed: Box<dyn Any + Send + 'static>| {
                *boxed
                    .downcast::<T>()
                    .unwrap_or_else(|_| panic!("writer actor result had unexpected type"))
            })
    }
}

/// Spawns the writer actor and returns a handle to it.
///
/// The actor holds one connection from `pool` for its whole lifetime and
/// processes jobs in submission order. It terminates when the last
/// `WriteHandle` is dropped.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<(ErasedJob, Reply)>(1024);

    tokio::spawn(async move {
        let mut conn = pool
            .get()
            .expect("failed to get a connection for the writer actor");

        while let Some((job, reply_tx)) = rx.recv().await {
            // StorageError unifies the job's core errors with Diesel's own
            // transaction errors; convert back at the boundary.
            let result: Result<Box<dyn Any + Send + 'static>> = conn
                .immediate_transaction::<_, StorageError, _>(|c| {
                    job(c).map_err(StorageError::from)
                })
                .map_err(|e: StorageError| e.into());

            // Receiver may have been dropped (caller cancelled); ignore.
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}
