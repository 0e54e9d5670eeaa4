//! Event queue following Game Engine Architecture Ch 16.8
//! Key principles:
//! - Events are plain data records, decoupled from whoever consumes them
//! - Handler returns bool (true = consumed, stops forwarding)
//! - Events queue up during a frame and are delivered together
//! - Consumers can either register handlers or drain the queue and poll

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait EventHandler<E> {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &E) -> bool;
}

/// Event queue with handler registration
/// Follows chain of responsibility pattern
pub struct EventQueue<E> {
    immediate_queue: Vec<E>,
    handlers: Vec<Box<dyn EventHandler<E>>>,
}

impl<E> EventQueue<E> {
    /// Create a new empty queue
    pub fn new() -> Self {
        Self {
            immediate_queue: Vec::new(),
            handlers: Vec::new(),
        }
    }

    /// Register a handler. Handlers are offered events in registration order.
    pub fn register_handler(&mut self, handler: Box<dyn EventHandler<E>>) {
        self.handlers.push(handler);
    }

    /// Queue an event for this frame
    pub fn send(&mut self, event: E) {
        self.immediate_queue.push(event);
    }

    /// Dispatch all pending events to the registered handlers
    pub fn dispatch(&mut self) {
        let immediate = std::mem::take(&mut self.immediate_queue);
        for event in &immediate {
            for handler in &mut self.handlers {
                if handler.on_event(event) {
                    // Event consumed, stop forwarding
                    break;
                }
            }
        }
    }

    /// Take every pending event without involving handlers
    pub fn drain(&mut self) -> Vec<E> {
        std::mem::take(&mut self.immediate_queue)
    }

    /// Events queued for this frame
    pub fn pending(&self) -> &[E] {
        &self.immediate_queue
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}
