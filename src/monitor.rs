use core::fmt;

use crate::system::DisplaySystem;

/// An active display, numbered by its position in the OS enumeration.
#[derive(Debug, Clone)]
pub struct Monitor<H> {
    index: usize,
    handle: H,
    name: Option<String>,
}

impl<H: Clone + fmt::Debug> Monitor<H> {
    pub fn new(index: usize, handle: H) -> Monitor<H> {
        Monitor {
            index,
            handle,
            name: None,
        }
    }

    /// Enumerates active displays and numbers them from zero.
    pub async fn enumerate<S>(system: &S) -> crate::error::Result<Vec<Monitor<H>>>
    where
        S: DisplaySystem<Handle = H>,
    {
        let handles = system.active_displays().await?;
        Ok(handles
            .into_iter()
            .enumerate()
            .map(|(index, handle)| Monitor::new(index, handle))
            .collect())
    }

    pub async fn with_name<S>(mut self, system: &S) -> Monitor<H>
    where
        S: DisplaySystem<Handle = H>,
    {
        self.name = system.display_name(&self.handle).await;
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl<H> fmt::Display for Monitor<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "Display {} ({})", self.index, name),
            None => write!(f, "Display {}", self.index),
        }
    }
}
