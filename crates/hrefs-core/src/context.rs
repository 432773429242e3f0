//! Scoped ambient resolvers.
//!
//! Code that cannot thread a resolver through its call chain (serde impls,
//! mostly) looks it up here. Each unit of execution owns its own stack:
//!
//! ```text
//! thread ──► THREAD_STACK  (enter_scope / with_resolver)
//! task   ──► TASK_STACK    (scope_async, then enter_scope inside it)
//! ```
//!
//! Inside [`scope_async`] the task's stack is used even if the task migrates
//! between worker threads; elsewhere the calling thread's stack is used. The
//! innermost scope wins. Scopes are RAII guards and are released on every exit
//! path, unwinding included.

use crate::error::ContextError;
use crate::resolver::Resolver;
use std::cell::RefCell;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

struct Entry {
    id: u64,
    resolver: Arc<dyn Resolver>,
}

type Stack = RefCell<Vec<Entry>>;

thread_local! {
    static THREAD_STACK: Stack = const { RefCell::new(Vec::new()) };
}

tokio::task_local! {
    static TASK_STACK: Stack;
}

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Thread,
    Task,
}

fn current_unit() -> Unit {
    if TASK_STACK.try_with(|_| ()).is_ok() {
        Unit::Task
    } else {
        Unit::Thread
    }
}

fn with_stack<R>(unit: Unit, f: impl FnOnce(&Stack) -> R) -> Option<R> {
    match unit {
        Unit::Thread => THREAD_STACK.try_with(f).ok(),
        Unit::Task => TASK_STACK.try_with(f).ok(),
    }
}

/// An active resolver scope. The resolver stays current until the scope is
/// exited or dropped.
#[must_use = "the resolver is deactivated as soon as the scope is dropped"]
#[derive(Debug)]
pub struct ResolverScope {
    id: u64,
    unit: Unit,
    active: bool,
    // Scopes belong to the thread or task that entered them.
    _not_send: PhantomData<*const ()>,
}

impl ResolverScope {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Exit explicitly, reporting misuse instead of logging it.
    pub fn exit(mut self) -> Result<(), ContextError> {
        self.active = false;
        pop(self.unit, self.id)
    }
}

impl Drop for ResolverScope {
    fn drop(&mut self) {
        if self.active {
            if let Err(err) = pop(self.unit, self.id) {
                tracing::error!(scope = self.id, error = %err, "resolver scope released out of order");
            }
        }
    }
}

fn pop(unit: Unit, id: u64) -> Result<(), ContextError> {
    let popped = with_stack(unit, |stack| {
        let mut stack = stack.borrow_mut();
        let innermost = stack.last().map(|entry| entry.id);
        match stack.iter().rposition(|entry| entry.id == id) {
            None => Err(ContextError::UnknownScope(id)),
            Some(position) => {
                stack.remove(position);
                match innermost {
                    Some(innermost) if innermost != id => Err(ContextError::ScopeMismatch {
                        exiting: id,
                        innermost,
                    }),
                    _ => Ok(()),
                }
            }
        }
    });
    tracing::trace!(scope = id, "exited resolver scope");
    popped.unwrap_or(Err(ContextError::UnknownScope(id)))
}

/// Make `resolver` current until the returned scope ends.
pub fn enter_scope(resolver: Arc<dyn Resolver>) -> ResolverScope {
    let id = NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed);
    let unit = current_unit();
    if with_stack(unit, |stack| stack.borrow_mut().push(Entry { id, resolver })).is_none() {
        tracing::warn!(scope = id, "resolver stack unavailable; scope is inert");
    }
    tracing::trace!(scope = id, unit = ?unit, "entered resolver scope");
    ResolverScope {
        id,
        unit,
        active: true,
        _not_send: PhantomData,
    }
}

/// Exit `scope`. Exiting anything but the innermost scope is an error; the
/// scope is released either way.
pub fn exit_scope(scope: ResolverScope) -> Result<(), ContextError> {
    scope.exit()
}

/// Run `f` with `resolver` current.
pub fn with_resolver<R>(resolver: Arc<dyn Resolver>, f: impl FnOnce() -> R) -> R {
    let _scope = enter_scope(resolver);
    f()
}

/// Run `future` on its own resolver stack with `resolver` current.
///
/// Concurrent tasks each see only their own scopes.
pub async fn scope_async<F: Future>(resolver: Arc<dyn Resolver>, future: F) -> F::Output {
    let id = NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed);
    tracing::trace!(scope = id, "entered task resolver scope");
    TASK_STACK
        .scope(RefCell::new(vec![Entry { id, resolver }]), future)
        .await
}

/// The innermost active resolver.
pub fn current_resolver() -> Result<Arc<dyn Resolver>, ContextError> {
    with_stack(current_unit(), |stack| {
        stack.borrow().last().map(|entry| Arc::clone(&entry.resolver))
    })
    .flatten()
    .ok_or(ContextError::NoActiveContext)
}

/// Number of scopes active on the current thread or task.
pub fn depth() -> usize {
    with_stack(current_unit(), |stack| stack.borrow().len()).unwrap_or(0)
}
