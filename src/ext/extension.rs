//! The extension: entry point for creating, retrieving, configuring, and
//! removing instances of one component kind.
//!
//! ```ignore
//! let tip = Extension::<Tip>::new(Namespace::new("tip"), ExtensionConfig::new().auto_listen(true));
//! let handle = tip.attach(&mut page, element, None)?;
//! handle.perform(&mut page, "configure", &[json!({ "selectors": "default" })])?;
//! handle.remove(&mut page)?;
//! ```

use std::cell::{Cell, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use super::component::{Component, Handler, Method, Setup};
use super::config::ExtensionConfig;
use super::context::Cx;
use super::instance::{bind_handler, bind_method, Instance, InstanceCore, InstanceRef, QueryFn};
use super::naming::Namespace;
use super::options::Options;
use super::registry::Registry;
use crate::dom::{Dom, ElementId};
use crate::error::ExtensionError;
use crate::event::Listener;
use crate::runtime::Page;

/// What to attach to.
pub enum Subject {
    /// A single element, which becomes the instance's element and root.
    Element(ElementId),
    /// A shared instance on `context`, operating on the elements `query`
    /// selects within it.
    Shared { query: QueryFn, context: ElementId },
}

impl From<ElementId> for Subject {
    fn from(element: ElementId) -> Self {
        Self::Element(element)
    }
}

impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(element) => f.debug_tuple("Element").field(element).finish(),
            Self::Shared { context, .. } => f
                .debug_struct("Shared")
                .field("context", context)
                .finish_non_exhaustive(),
        }
    }
}

struct Shared<T> {
    namespace: Rc<Namespace>,
    config: Rc<ExtensionConfig>,
    registry: RefCell<Registry<T>>,
    class_initialized: Cell<bool>,
}

// ---------------------------------------------------------------------------
// Extension
// ---------------------------------------------------------------------------

/// One component kind bound to its namespace. Cloning shares the registry.
pub struct Extension<T: Component> {
    shared: Rc<Shared<T>>,
}

impl<T: Component> Clone for Extension<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: Component> Extension<T> {
    pub fn new(namespace: Namespace, config: ExtensionConfig) -> Self {
        Self {
            shared: Rc::new(Shared {
                namespace: Rc::new(namespace),
                config: Rc::new(config),
                registry: RefCell::new(Registry::new()),
                class_initialized: Cell::new(false),
            }),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.shared.namespace
    }

    pub fn config(&self) -> &ExtensionConfig {
        &self.shared.config
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.shared.registry.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get or create the instance on `element`. `options` only apply when the
    /// instance is created; an existing instance is returned unchanged.
    pub fn attach(
        &self,
        page: &mut Page,
        element: ElementId,
        options: Option<Value>,
    ) -> Result<ExtensionHandle<T>, ExtensionError> {
        self.get_or_create(page, element, None, options)
    }

    /// Get or create the shared instance on `context`. `query` runs at
    /// creation to fill `elements` and is kept for [`Cx::requery`].
    pub fn attach_shared(
        &self,
        page: &mut Page,
        query: impl Fn(&Dom, ElementId) -> Vec<ElementId> + 'static,
        context: ElementId,
        options: Option<Value>,
    ) -> Result<ExtensionHandle<T>, ExtensionError> {
        self.get_or_create(page, context, Some(Rc::new(query)), options)
    }

    /// Attach to every descendant of `scope` matching `selector`.
    pub fn attach_matching(
        &self,
        page: &mut Page,
        scope: ElementId,
        selector: &str,
        options: Option<Value>,
    ) -> Result<Vec<ExtensionHandle<T>>, ExtensionError> {
        let elements = page.dom.query_selector_all(scope, selector)?;
        elements
            .into_iter()
            .map(|element| self.attach(page, element, options.clone()))
            .collect()
    }

    pub fn invoke(
        &self,
        page: &mut Page,
        subject: impl Into<Subject>,
        options: Option<Value>,
    ) -> Result<ExtensionHandle<T>, ExtensionError> {
        match subject.into() {
            Subject::Element(element) => self.get_or_create(page, element, None, options),
            Subject::Shared { query, context } => self.get_or_create(page, context, Some(query), options),
        }
    }

    /// The instance registered on `element`, if any.
    pub fn get(&self, page: &Page, element: ElementId) -> Option<ExtensionHandle<T>> {
        let (id, instance) = self.lookup(&page.dom, element)?;
        Some(self.handle(id, instance))
    }

    /// Remove the instance on `element`. Returns whether there was one.
    pub fn delete(&self, page: &mut Page, element: ElementId) -> Result<bool, ExtensionError> {
        match self.lookup(&page.dom, element) {
            Some((id, instance)) => {
                self.destroy(page, id, &instance, true)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove every live instance.
    pub fn delete_all(&self, page: &mut Page) -> Result<(), ExtensionError> {
        let ids = self.shared.registry.borrow().ids();
        for id in ids {
            let instance = self.shared.registry.borrow().get(id);
            if let Some(instance) = instance {
                self.destroy(page, id, &instance, true)?;
            }
        }
        Ok(())
    }

    /// The instance whose id `element` carries and which is rooted on
    /// `element`. Ids copied onto other elements do not resolve.
    fn lookup(&self, dom: &Dom, element: ElementId) -> Option<(u64, InstanceRef<T>)> {
        let id: u64 = dom
            .attr(element, &self.shared.namespace.instance_id_attr())?
            .parse()
            .ok()?;
        let instance = self.shared.registry.borrow().find(id, element)?;
        Some((id, instance))
    }

    fn handle(&self, id: u64, instance: InstanceRef<T>) -> ExtensionHandle<T> {
        ExtensionHandle {
            extension: self.clone(),
            instance,
            id,
        }
    }

    fn get_or_create(
        &self,
        page: &mut Page,
        root: ElementId,
        query: Option<QueryFn>,
        call_options: Option<Value>,
    ) -> Result<ExtensionHandle<T>, ExtensionError> {
        let namespace = &self.shared.namespace;
        if !page.dom.contains_node(root) {
            return Err(ExtensionError::UnknownElement(root));
        }
        if let Some((id, instance)) = self.lookup(&page.dom, root) {
            if call_options.is_some() {
                tracing::debug!(%namespace, id, "instance exists, ignoring options");
            }
            return Ok(self.handle(id, instance));
        }
        if let Some(stale) = page.dom.attr(root, &namespace.instance_id_attr()) {
            tracing::warn!(%namespace, stale, element = ?root, "unrecognized instance id, replacing");
        }

        let id = self.shared.registry.borrow_mut().next_id();
        let options = Options::resolve(
            namespace.defaults(),
            page.dom.attr(root, &namespace.attr_name("")),
            call_options.as_ref(),
        );
        let (element, context) = match query {
            Some(_) => (None, Some(root)),
            None => (Some(root), None),
        };
        let elements = match (&query, context) {
            (Some(query), Some(context)) => query(&page.dom, context),
            _ => Vec::new(),
        };
        let component = T::create(&Setup {
            page,
            namespace,
            element,
            context_element: context,
            elements: &elements,
            options: &options,
        });
        let listeners = component.event_listeners(namespace);
        let mut core = InstanceCore::new(
            id,
            Rc::clone(namespace),
            Rc::clone(&self.shared.config),
            element,
            context,
            root,
            options,
        );
        core.elements = elements;
        core.query = query;
        let instance = Instance::new_cell(core, component, &listeners);

        self.shared.registry.borrow_mut().insert(id, root, Rc::clone(&instance));
        if let Some(data) = page.dom.get_mut(root) {
            data.set_attr(namespace.instance_id_attr(), id.to_string());
            data.add_class(&namespace.main_class());
        }
        if !self.shared.class_initialized.replace(true) {
            T::init_class(page);
        }
        tracing::debug!(%namespace, id, element = ?root, "instance created");

        let setup = {
            let mut borrowed = instance
                .try_borrow_mut()
                .map_err(|_| self.busy(id))?;
            let result = borrowed.run(page, |component, cx| {
                if cx.core.config.auto_select {
                    cx.select_to_properties()?;
                }
                if cx.core.config.auto_listen {
                    cx.add_event_listeners()?;
                }
                component.init(cx);
                Ok::<_, ExtensionError>(())
            });
            result
        };
        if let Err(err) = setup {
            tracing::warn!(%namespace, id, error = %err, "instance setup failed, rolling back");
            self.destroy(page, id, &instance, false)?;
            return Err(err);
        }
        page.flush_deferred();
        Ok(self.handle(id, instance))
    }

    /// Tear an instance down. Already-removed instances are a no-op.
    fn destroy(
        &self,
        page: &mut Page,
        id: u64,
        instance: &InstanceRef<T>,
        deinit: bool,
    ) -> Result<(), ExtensionError> {
        let namespace = &self.shared.namespace;
        {
            let mut borrowed = instance.try_borrow_mut().map_err(|_| self.busy(id))?;
            if borrowed.core.removed {
                return Ok(());
            }
            borrowed.run(page, |component, cx| {
                if deinit {
                    component.deinit(cx);
                }
                cx.remove_event_listeners();
                cx.clear_all_timeouts();
                let root = cx.root_element();
                let id_attr = namespace.instance_id_attr();
                if let Some(data) = cx.page.dom.get_mut(root) {
                    if data.attr(&id_attr) == Some(id.to_string().as_str()) {
                        data.remove_attr(&id_attr);
                        data.remove_class(&namespace.main_class());
                    }
                }
                cx.core.removed = true;
            });
        }
        self.shared.registry.borrow_mut().remove(id);
        tracing::debug!(%namespace, id, "instance removed");
        page.flush_deferred();
        Ok(())
    }

    fn busy(&self, id: u64) -> ExtensionError {
        ExtensionError::Busy {
            extension: self.shared.namespace.name().to_owned(),
            id,
        }
    }
}

impl<T: Component> fmt::Debug for Extension<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension")
            .field("namespace", &self.shared.namespace.name())
            .field("config", &self.shared.config)
            .field("instances", &self.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// ExtensionHandle
// ---------------------------------------------------------------------------

/// Handle to one instance, returned by every attach call.
pub struct ExtensionHandle<T: Component> {
    extension: Extension<T>,
    instance: InstanceRef<T>,
    id: u64,
}

impl<T: Component> Clone for ExtensionHandle<T> {
    fn clone(&self) -> Self {
        Self {
            extension: self.extension.clone(),
            instance: Rc::clone(&self.instance),
            id: self.id,
        }
    }
}

impl<T: Component> ExtensionHandle<T> {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The instance cell.
    pub fn instance(&self) -> InstanceRef<T> {
        Rc::clone(&self.instance)
    }

    /// Whether both handles refer to the same instance.
    pub fn same_instance(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.instance, &other.instance)
    }

    pub fn is_removed(&self) -> bool {
        self.instance
            .try_borrow()
            .map(|instance| instance.core.removed)
            .unwrap_or(false)
    }

    /// Read the instance.
    pub fn read<R>(&self, f: impl FnOnce(&Instance<T>) -> R) -> Result<R, ExtensionError> {
        let instance = self.instance.try_borrow().map_err(|_| self.extension.busy(self.id))?;
        let result = f(&instance);
        Ok(result)
    }

    /// Run `f` against the live instance.
    pub fn with<R>(
        &self,
        page: &mut Page,
        f: impl FnOnce(&mut T, &mut Cx<'_, T>) -> R,
    ) -> Result<R, ExtensionError> {
        let mut instance = self.borrow_live()?;
        let result = instance.run(page, f);
        drop(instance);
        page.flush_deferred();
        Ok(result)
    }

    /// Perform an action. `"remove"` and `"configure"` are built in; other
    /// names go to the component's actions, then its fallback `perform`.
    pub fn perform(&self, page: &mut Page, action: &str, args: &[Value]) -> Result<(), ExtensionError> {
        match action {
            "remove" => self.remove(page),
            "configure" => {
                let partial = args.first().cloned().unwrap_or_else(|| Value::Object(Map::new()));
                self.configure(page, partial)
            }
            _ => {
                let declared = T::actions().get(action);
                self.with(page, |component, cx| match declared {
                    Some(perform) => perform(component, cx, args),
                    None => component.perform(cx, action, args),
                })?
            }
        }
    }

    /// Remove the instance. Safe to call more than once.
    pub fn remove(&self, page: &mut Page) -> Result<(), ExtensionError> {
        self.extension.destroy(page, self.id, &self.instance, true)
    }

    /// Apply a partial option update (see [`Options::configure`]). Selections
    /// are re-resolved when `selectors` changes under auto-select.
    pub fn configure(&self, page: &mut Page, partial: Value) -> Result<(), ExtensionError> {
        self.with(page, |_, cx| {
            let namespace = Rc::clone(&cx.core.namespace);
            let touched = cx.core.options.configure(namespace.defaults(), partial)?;
            if cx.core.config.auto_select && touched.iter().any(|key| key == "selectors") {
                cx.select_to_properties()?;
            }
            cx.debug_log(format_args!("configured {touched:?}"));
            Ok(())
        })?
    }

    /// Dispatch a namespaced custom event on the root element.
    pub fn dispatch_custom_event(
        &self,
        page: &mut Page,
        kind: &str,
        detail: Value,
    ) -> Result<bool, ExtensionError> {
        let event = self.with(page, |_, cx| cx.create_custom_event(kind, detail))?;
        Ok(page.dispatch(event))
    }

    pub fn add_event_listeners(&self, page: &mut Page) -> Result<(), ExtensionError> {
        self.with(page, |_, cx| cx.add_event_listeners())?
    }

    pub fn remove_event_listeners(&self, page: &mut Page) -> Result<(), ExtensionError> {
        self.with(page, |_, cx| cx.remove_event_listeners())
    }

    pub fn toggle_event_listeners(&self, page: &mut Page, on: bool) -> Result<(), ExtensionError> {
        self.with(page, |_, cx| cx.toggle_event_listeners(on))?
    }

    /// A listener that runs `handler` against this instance, however it is called.
    pub fn bind(&self, handler: Handler<T>) -> Listener {
        bind_handler(Rc::downgrade(&self.instance), handler)
    }

    /// Like [`bind`](Self::bind) for a method without an event.
    pub fn bind_method(&self, method: Method<T>) -> Rc<dyn Fn(&mut Page)> {
        bind_method(Rc::downgrade(&self.instance), method)
    }

    /// The pre-bound listener for a declared event (auto-bind only).
    pub fn bound_listener(&self, event: &str) -> Option<Listener> {
        self.instance.try_borrow().ok()?.bound_listener(event)
    }

    fn borrow_live(&self) -> Result<RefMut<'_, Instance<T>>, ExtensionError> {
        let instance = self
            .instance
            .try_borrow_mut()
            .map_err(|_| self.extension.busy(self.id))?;
        if instance.core.removed {
            return Err(ExtensionError::Removed {
                extension: self.extension.namespace().name().to_owned(),
                id: self.id,
            });
        }
        Ok(instance)
    }
}

impl<T: Component> fmt::Debug for ExtensionHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionHandle")
            .field("namespace", &self.extension.namespace().name())
            .field("id", &self.id)
            .finish()
    }
}
