use std::collections::HashMap;

use log::trace;

use super::{Window, WindowId, WmError};

/// Arena of windows keyed by id, plus the stacking counter they share.
pub struct Registry<C> {
    windows: HashMap<WindowId, Window<C>>,
    top_z: u64,
    generated: u64,
}

impl<C> Registry<C> {
    pub fn new(z_base: u64) -> Self {
        Registry {
            windows: HashMap::new(),
            top_z: z_base,
            generated: 0,
        }
    }

    /// Hands out the next stacking value. Values are never reused.
    pub fn next_z(&mut self) -> u64 {
        self.top_z += 1;
        self.top_z
    }

    pub fn top_z(&self) -> u64 {
        self.top_z
    }

    /// An id for content that came without one.
    pub fn generate_id(&mut self) -> WindowId {
        loop {
            self.generated += 1;
            let id = WindowId::from(format!("dialog-{}", self.generated));
            if !self.windows.contains_key(&id) {
                return id;
            }
        }
    }

    pub fn insert(&mut self, window: Window<C>) -> Result<(), WmError> {
        if self.windows.contains_key(&window.id) {
            return Err(WmError::AlreadyRegistered(window.id.clone()));
        }
        self.windows.insert(window.id.clone(), window);
        Ok(())
    }

    pub fn remove(&mut self, id: &WindowId) -> Result<Window<C>, WmError> {
        self.windows
            .remove(id)
            .ok_or_else(|| WmError::NotFound(id.clone()))
    }

    pub fn contains(&self, id: &WindowId) -> bool {
        self.windows.contains_key(id)
    }

    pub fn get(&self, id: &WindowId) -> Result<&Window<C>, WmError> {
        self.windows
            .get(id)
            .ok_or_else(|| WmError::NotFound(id.clone()))
    }

    pub fn get_mut(&mut self, id: &WindowId) -> Result<&mut Window<C>, WmError> {
        self.windows
            .get_mut(id)
            .ok_or_else(|| WmError::NotFound(id.clone()))
    }

    pub fn raise(&mut self, id: &WindowId) -> Result<u64, WmError> {
        let z = self.top_z + 1;
        let window = self.get_mut(id)?;
        window.z_order = z;
        self.top_z = z;
        trace!("raised {} to {}", id, z);
        Ok(z)
    }

    pub fn ids(&self) -> Vec<WindowId> {
        self.windows.keys().cloned().collect()
    }

    pub fn live(&self) -> impl Iterator<Item = &Window<C>> {
        self.windows.values().filter(|w| w.is_live())
    }

    /// Live windows, back to front.
    pub fn stacking(&self) -> Vec<WindowId> {
        let mut live: Vec<_> = self.live().map(|w| (w.z_order, w.id.clone())).collect();
        live.sort_unstable();
        live.into_iter().map(|(_, id)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::anchor::Anchor;
    use crate::dialogwm::{Constraints, Dimension, Length, Settings, WindowState};

    fn window(id: &str, z: u64) -> Window<()> {
        let settings = Settings {
            title: String::from("Dialog"),
            width: Dimension::Auto,
            height: Dimension::Auto,
            min_width: Length::Px(150),
            min_height: Length::Px(150),
            draggable: true,
            modal: false,
            anchor: Anchor::Centered,
            buttons: Vec::new(),
            auto_open: true,
            extra: BTreeMap::new(),
        };
        let constraints = Constraints {
            max_width_fraction: 0.95,
            max_height_fraction: 0.9,
            margin: 0,
        };
        Window::new(WindowId::from(id), (), settings, constraints, None, z)
    }

    #[test]
    fn ids_are_unique() {
        let mut registry = Registry::new(0);
        let z = registry.next_z();
        registry.insert(window("a", z)).unwrap();
        assert!(matches!(
            registry.insert(window("a", 9)),
            Err(WmError::AlreadyRegistered(_))
        ));
        assert_eq!(registry.get(&WindowId::from("a")).unwrap().z_order, z);
    }

    #[test]
    fn generated_ids_skip_taken_ones() {
        let mut registry = Registry::new(0);
        registry.insert(window("dialog-1", 1)).unwrap();
        assert_eq!(registry.generate_id(), WindowId::from("dialog-2"));
    }

    #[test]
    fn raise_moves_to_front() {
        let mut registry = Registry::new(100);
        for id in ["a", "b", "c"] {
            let z = registry.next_z();
            let mut w = window(id, z);
            w.state = WindowState::Open;
            registry.insert(w).unwrap();
        }
        registry.raise(&WindowId::from("a")).unwrap();
        let order: Vec<_> = registry
            .stacking()
            .iter()
            .map(|id| id.to_string())
            .collect();
        assert_eq!(order, ["b", "c", "a"]);
        assert_eq!(registry.get(&WindowId::from("a")).unwrap().z_order, 104);
        assert!(registry.raise(&WindowId::from("zzz")).is_err());
    }
}
