/// Orbit-style control of the free camera
pub trait OrbitControl {
    fn set_enabled(&mut self, enabled: bool);

    fn is_enabled(&self) -> bool;
}

/// Host notification about pointer capture. These arrive asynchronously,
/// some time after `PointerCapture::lock`/`unlock` were called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureEvent {
    /// Host granted the capture request
    Granted,
    /// Capture ended on the host side (escape key, focus loss)
    Released,
    /// Host refused the capture request
    Denied,
}

/// Pointer-capture (first-person look) control bound to one camera
pub trait PointerCapture {
    /// Ask for capture. The result comes back later through `notify`.
    fn lock(&mut self);

    /// Give up capture, or withdraw an outstanding request
    fn unlock(&mut self);

    /// Capture granted and still held
    fn is_locked(&self) -> bool;

    /// A lock request is waiting for the host's answer
    fn is_pending(&self) -> bool {
        false
    }

    /// Apply a host notification to the control's own state
    fn notify(&mut self, event: CaptureEvent);

    /// Holding capture or waiting for it
    fn is_engaged(&self) -> bool {
        self.is_locked() || self.is_pending()
    }
}
