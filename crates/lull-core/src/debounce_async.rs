use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use web_time::Duration;

use crate::debounce::{DebounceOptions, Debounced};
use crate::error::TriggerError;
use crate::executor::spawn_local;

type Waiter<O> = oneshot::Sender<Result<O, TriggerError>>;

/// Debounced wrapper around an async callback.
///
/// Each call returns a [`DebouncedCall`] that resolves with the output of the
/// invocation that used that call's arguments. Calls folded into a later one
/// resolve to [`TriggerError::Superseded`]; cancelled calls to
/// [`TriggerError::Cancelled`]. An already started future is never
/// interrupted.
pub struct AsyncDebounced<A: 'static, O: 'static> {
    debounced: Debounced<A, ()>,
    waiter: Rc<RefCell<Option<Waiter<O>>>>,
}

impl<A: 'static, O: 'static> Clone for AsyncDebounced<A, O> {
    fn clone(&self) -> Self {
        Self {
            debounced: self.debounced.clone(),
            waiter: self.waiter.clone(),
        }
    }
}

pub fn debounce_async<A, O, Fut>(
    f: impl Fn(A) -> Fut + 'static,
    wait: Duration,
) -> AsyncDebounced<A, O>
where
    A: 'static,
    O: 'static,
    Fut: Future<Output = O> + 'static,
{
    AsyncDebounced::new(f, wait, DebounceOptions::default())
}

impl<A: 'static, O: 'static> AsyncDebounced<A, O> {
    pub fn new<Fut>(
        f: impl Fn(A) -> Fut + 'static,
        wait: Duration,
        options: DebounceOptions,
    ) -> Self
    where
        Fut: Future<Output = O> + 'static,
    {
        let waiter: Rc<RefCell<Option<Waiter<O>>>> = Rc::new(RefCell::new(None));
        let debounced = {
            let waiter = waiter.clone();
            Debounced::new(
                move |args: A| {
                    let tx = waiter.borrow_mut().take();
                    let fut = f(args);
                    let spawned = spawn_local(async move {
                        let out = fut.await;
                        if let Some(tx) = tx {
                            // The caller may have dropped its DebouncedCall.
                            let _ = tx.send(Ok(out));
                        }
                    });
                    if let Err(e) = spawned {
                        log::error!("debounced callback was not started: {e}");
                    }
                },
                wait,
                options,
            )
        };
        Self { debounced, waiter }
    }

    pub fn call(&self, args: A) -> DebouncedCall<O> {
        let (tx, rx) = oneshot::channel();
        let prev = self.waiter.borrow_mut().replace(tx);
        if let Some(prev) = prev {
            let _ = prev.send(Err(TriggerError::Superseded));
        }
        self.debounced.call(args);
        DebouncedCall { rx }
    }

    pub fn cancel(&self) {
        self.debounced.cancel();
        let waiter = self.waiter.borrow_mut().take();
        if let Some(tx) = waiter {
            let _ = tx.send(Err(TriggerError::Cancelled));
        }
    }

    /// Start a pending invocation now. Its output still arrives through the
    /// pending `DebouncedCall`.
    pub fn flush(&self) {
        self.debounced.flush();
    }

    pub fn is_pending(&self) -> bool {
        self.debounced.is_pending()
    }
}

/// Outcome of one [`AsyncDebounced::call`].
#[must_use = "a DebouncedCall only reports the outcome; dropping it does not cancel the call"]
pub struct DebouncedCall<O> {
    rx: oneshot::Receiver<Result<O, TriggerError>>,
}

impl<O> DebouncedCall<O> {
    /// The outcome if it is already known.
    pub fn try_take(&mut self) -> Option<Result<O, TriggerError>> {
        match self.rx.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::Canceled) => Some(Err(TriggerError::Cancelled)),
        }
    }
}

impl<O> Future for DebouncedCall<O> {
    type Output = Result<O, TriggerError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(TriggerError::Cancelled)),
            Poll::Pending => Poll::Pending,
        }
    }
}
