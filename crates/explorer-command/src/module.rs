//! Process-wide activation state.
//!
//! The host activates the command object through a class-object factory and
//! polls the module for unload-readiness. Both concerns live here as explicit
//! state: a registration table mapping class ids to constructors, and an
//! atomic count of outstanding instances and server locks. Nothing depends
//! on static initialization order; the platform layer registers its classes
//! explicitly before first use.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use uuid::Uuid;

use crate::command::ExplorerCommand;
use crate::error::{CommandError, Result};

type CommandFactory = Box<dyn Fn() -> Arc<dyn ExplorerCommand> + Send + Sync>;

/// Keeps the module loaded while an activated instance is alive. Created by
/// [`ComModule::create_instance`]; dropping it releases the count.
pub struct InstanceGuard {
    live: Arc<AtomicUsize>,
}

impl InstanceGuard {
    fn acquire(live: &Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::AcqRel);
        Self { live: live.clone() }
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Registration table plus outstanding-instance counter.
#[derive(Default)]
pub struct ComModule {
    classes: RwLock<HashMap<Uuid, CommandFactory>>,
    live: Arc<AtomicUsize>,
}

impl ComModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide module instance.
    pub fn global() -> &'static ComModule {
        static MODULE: OnceLock<ComModule> = OnceLock::new();
        MODULE.get_or_init(ComModule::new)
    }

    /// Registers a constructor for `clsid`. Re-registering a class id
    /// replaces the previous constructor.
    pub fn register_class<F>(&self, clsid: Uuid, factory: F)
    where
        F: Fn() -> Arc<dyn ExplorerCommand> + Send + Sync + 'static,
    {
        self.classes.write().insert(clsid, Box::new(factory));
    }

    /// True if `clsid` has a registered constructor.
    pub fn has_class(&self, clsid: &Uuid) -> bool {
        self.classes.read().contains_key(clsid)
    }

    /// Instantiates the command registered under `clsid`. The returned guard
    /// keeps [`ComModule::can_unload_now`] false until dropped.
    pub fn create_instance(
        &self,
        clsid: &Uuid,
    ) -> Result<(Arc<dyn ExplorerCommand>, InstanceGuard)> {
        let classes = self.classes.read();
        let factory = classes
            .get(clsid)
            .ok_or(CommandError::ClassNotAvailable(*clsid))?;
        Ok((factory(), InstanceGuard::acquire(&self.live)))
    }

    /// Class-factory `LockServer`: pins (or unpins) the module without an
    /// instance.
    pub fn lock_server(&self, lock: bool) {
        if lock {
            self.live.fetch_add(1, Ordering::AcqRel);
        } else {
            self.live.fetch_sub(1, Ordering::AcqRel);
        }
    }

    /// Unload-readiness: true iff no instance or server lock is outstanding.
    pub fn can_unload_now(&self) -> bool {
        self.live.load(Ordering::Acquire) == 0
    }

    /// WinRT-style activation by class name. The command object is activated
    /// through the classic class table only, so every query fails.
    pub fn activation_factory(&self, activatable_class_id: &str) -> Result<()> {
        Err(CommandError::ActivatableClassNotAvailable(
            activatable_class_id.to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandState, ExplorerCommand};
    use crate::error::Result;
    use crate::selection::Selection;

    struct NoopCommand;

    impl ExplorerCommand for NoopCommand {
        fn title(&self, _selection: &Selection) -> Result<String> {
            Ok("noop".to_string())
        }

        fn invoke(&self, _selection: &Selection) -> Result<()> {
            Ok(())
        }
    }

    fn registered_module() -> (ComModule, Uuid) {
        let module = ComModule::new();
        let clsid = Uuid::new_v4();
        module.register_class(clsid, || Arc::new(NoopCommand));
        (module, clsid)
    }

    #[test]
    fn registered_class_is_instantiable() {
        let (module, clsid) = registered_module();
        assert!(module.has_class(&clsid));
        let (command, _guard) = module.create_instance(&clsid).expect("instance");
        assert_eq!(command.title(&Selection::empty()).expect("title"), "noop");
        assert_eq!(
            command
                .state(&Selection::empty(), false)
                .expect("state"),
            CommandState::Enabled
        );
    }

    #[test]
    fn unknown_class_is_not_available() {
        let (module, _) = registered_module();
        let other = Uuid::new_v4();
        let error = module
            .create_instance(&other)
            .err()
            .expect("unknown class should fail");
        assert!(matches!(error, CommandError::ClassNotAvailable(id) if id == other));
    }

    #[test]
    fn can_unload_tracks_outstanding_instances() {
        let (module, clsid) = registered_module();
        assert!(module.can_unload_now());

        let first = module.create_instance(&clsid).expect("instance");
        let second = module.create_instance(&clsid).expect("instance");
        assert!(!module.can_unload_now());

        drop(first);
        assert!(!module.can_unload_now());
        drop(second);
        assert!(module.can_unload_now());
    }

    #[test]
    fn server_locks_pin_the_module() {
        let (module, _) = registered_module();
        module.lock_server(true);
        assert!(!module.can_unload_now());
        module.lock_server(false);
        assert!(module.can_unload_now());
    }

    #[test]
    fn activation_factory_queries_always_fail() {
        let (module, _) = registered_module();
        let error = module
            .activation_factory("Test.ContextMenu")
            .expect_err("no activatable classes");
        assert!(matches!(
            error,
            CommandError::ActivatableClassNotAvailable(name) if name == "Test.ContextMenu"
        ));
    }
}
