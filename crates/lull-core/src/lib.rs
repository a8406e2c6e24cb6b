//! # Components, state and effects
//!
//! Lull hosts hook-style components: a component is a render closure, and the
//! hooks it calls keep their state in the component's slot table between
//! renders. There are four main pieces:
//!
//! - `Host<R>`: a mounted component instance.
//! - `remember*` / `use_state` / `use_ref` / `use_memo`: storage bound to the
//!   instance.
//! - `use_effect` / `use_layout_effect`: side effects keyed on dependencies,
//!   with cleanup.
//! - timers, a clock and `debounce` / `throttle` driven by `tick()`.
//!
//! ## State
//!
//! ```rust
//! use lull_core::*;
//!
//! let host = Host::mount(|| {
//!     let (count, set_count) = use_state(|| 0);
//!     (count, set_count)
//! });
//!
//! let (_, set_count) = host.output();
//! set_count.update(|v| *v += 1);
//! flush().unwrap();
//! assert_eq!(host.output().0, 1);
//! ```
//!
//! - `remember` and everything built on it is order‑based: the Nth hook call
//!   in a render always refers to the Nth stored value.
//! - `remember_with_key` is key‑based and stable across conditional branches.
//! - Setters write immediately and re-render the component on the next
//!   `flush()` / `tick()`.
//!
//! ## Effects and cleanup
//!
//! ```rust
//! use lull_core::*;
//!
//! let host = Host::mount(|| {
//!     use_effect((), || {
//!         log::info!("mounted");
//!         on_unmount(|| log::info!("unmounted"))
//!     });
//! });
//! host.unmount();
//! ```
//!
//! - Effects run after the render that changed their dependencies; layout
//!   effects run before the paint callback, passive effects after it.
//! - The returned `Dispose` runs before the effect runs again and when the
//!   component unmounts.
//!
//! ## Time
//!
//! Nothing here owns a thread or an event loop. `tick()` fires due timers,
//! polls local tasks and re-renders dirty components; hosts call it from their
//! frame loop, tests drive it through `TestClock::advance`.

pub mod clock;
pub mod debounce;
pub mod debounce_async;
pub mod effects;
pub mod effects_ext;
pub mod error;
pub mod executor;
pub mod prelude;
pub mod runtime;
pub mod scope;
pub mod state;
pub mod timers;


pub use clock::*;
pub use debounce::*;
pub use debounce_async::*;
pub use effects::*;
pub use effects_ext::*;
pub use error::*;
pub use executor::*;
pub use runtime::*;
pub use scope::*;
pub use state::*;
pub use timers::*;
pub use web_time::{Duration, Instant};
