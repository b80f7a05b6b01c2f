use std::{
    env,
    ffi::OsString,
    sync::{Mutex, MutexGuard},
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Sets an env var for the lifetime of the guard and restores the previous
/// value on drop. Holds the process-wide env lock meanwhile.
pub struct ScopedEnvVar {
    name: &'static str,
    previous: Option<OsString>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnvVar {
    pub fn set(name: &'static str, value: &str) -> Self {
        let lock = ENV_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let previous = env::var_os(name);
        // SAFETY: env is guarded by process-wide test mutex.
        unsafe { env::set_var(name, value) };

        Self {
            name,
            previous,
            _lock: lock,
        }
    }
}

impl Drop for ScopedEnvVar {
    fn drop(&mut self) {
        match self.previous.take() {
            // SAFETY: restoring env while the lock is still held.
            Some(value) => unsafe { env::set_var(self.name, value) },
            // SAFETY: restoring env while the lock is still held.
            None => unsafe { env::remove_var(self.name) },
        }
    }
}
