use std::rc::Rc;

/// Update callback; receives the frame delta in seconds.
pub type UpdateFn = Rc<dyn Fn(f32)>;
/// Draw callback.
pub type DrawFn = Rc<dyn Fn()>;
/// Focus-gained callback.
pub type FocusFn = Rc<dyn Fn()>;
/// Focus-lost callback.
pub type BlurFn = Rc<dyn Fn()>;
/// Resize callback; receives the new logical `(width, height)`.
pub type ResizeFn = Rc<dyn Fn(f32, f32)>;

/// Ordered callback lists, one per lifecycle event.
///
/// Insertion order is invocation order. The same handle may appear more than
/// once and is then invoked once per occurrence.
#[derive(Default)]
pub struct Callbacks {
    update: Vec<UpdateFn>,
    draw: Vec<DrawFn>,
    focus: Vec<FocusFn>,
    blur: Vec<BlurFn>,
    resize: Vec<ResizeFn>,
}

impl Callbacks {
    pub fn add<K: CallbackKind>(&mut self, callback: Rc<K::Handler>) {
        K::list_mut(self).push(callback);
    }

    /// Removes the first handle identical to `callback`. Returns whether one was found.
    pub fn remove<K: CallbackKind>(&mut self, callback: &Rc<K::Handler>) -> bool {
        let list = K::list_mut(self);
        match list.iter().position(|c| Rc::ptr_eq(c, callback)) {
            Some(index) => {
                list.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len<K: CallbackKind>(&self) -> usize {
        K::list(self).len()
    }

    pub(crate) fn update(&self) -> &[UpdateFn] {
        &self.update
    }

    pub(crate) fn draw(&self) -> &[DrawFn] {
        &self.draw
    }

    pub(crate) fn focus(&self) -> &[FocusFn] {
        &self.focus
    }

    pub(crate) fn blur(&self) -> &[BlurFn] {
        &self.blur
    }

    pub(crate) fn resize(&self) -> &[ResizeFn] {
        &self.resize
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Lifecycle event a callback is registered against.
///
/// Implemented by the marker types [`Update`], [`Draw`], [`Focus`], [`Blur`]
/// and [`Resize`]; each fixes the callback signature for its list.
pub trait CallbackKind: sealed::Sealed + Copy {
    type Handler: ?Sized;

    /// Event name used in diagnostics.
    const NAME: &'static str;

    #[doc(hidden)]
    fn list(callbacks: &Callbacks) -> &Vec<Rc<Self::Handler>>;

    #[doc(hidden)]
    fn list_mut(callbacks: &mut Callbacks) -> &mut Vec<Rc<Self::Handler>>;
}

macro_rules! callback_kind {
    ($(#[$meta:meta])* $kind:ident, $field:ident, $handler:ty, $name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq)]
        pub struct $kind;

        impl sealed::Sealed for $kind {}

        impl CallbackKind for $kind {
            type Handler = $handler;
            const NAME: &'static str = $name;

            fn list(callbacks: &Callbacks) -> &Vec<Rc<Self::Handler>> {
                &callbacks.$field
            }

            fn list_mut(callbacks: &mut Callbacks) -> &mut Vec<Rc<Self::Handler>> {
                &mut callbacks.$field
            }
        }
    };
}

callback_kind!(
    /// Runs once per frame before drawing, with the frame delta.
    Update, update, dyn Fn(f32), "update"
);
callback_kind!(
    /// Runs once per frame after the render target is cleared.
    Draw, draw, dyn Fn(), "draw"
);
callback_kind!(
    /// Runs when the surface gains focus.
    Focus, focus, dyn Fn(), "focus"
);
callback_kind!(
    /// Runs when the surface loses focus.
    Blur, blur, dyn Fn(), "blur"
);
callback_kind!(
    /// Runs when the window is resized.
    Resize, resize, dyn Fn(f32, f32), "resize"
);
