pub use crate::clock::{Clock, SystemClock, TestClock, now, set_clock};
pub use crate::debounce::{DebounceOptions, Debounced, debounce, debounce_with, throttle};
pub use crate::debounce_async::{AsyncDebounced, DebouncedCall, debounce_async};
pub use crate::effects::{Dispose, on_unmount};
pub use crate::effects_ext::{use_effect, use_layout_effect};
pub use crate::error::{RuntimeError, TriggerError};
pub use crate::executor::spawn_local;
pub use crate::runtime::{Host, Tick, flush, remember, remember_with_key, tick};
pub use crate::scope::{Scope, current_scope, scoped_effect};
pub use crate::state::{MutableRef, Setter, use_memo, use_ref, use_state};
pub use crate::timers::{TimerId, clear_timer, set_interval, set_timeout};
pub use web_time::Duration;
