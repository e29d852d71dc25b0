//! Device identifier to limb registry
//!
//! Every sensor unit is bound to exactly one limb. The binding is static for a
//! given rig; frames from devices outside the table are discarded by the framer.

use super::limbs::Limb;
use crate::devices::wt55::constants::DEVICE_ID_LEN;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Factory-assigned device ids of the AzureLoong rig
const DEVICE_TABLE: [(&str, Limb); 15] = [
    ("WT5500002652", Limb::Body),
    ("WT5500006896", Limb::Head),
    ("WT5500006713", Limb::Waist),
    ("WT5500006892", Limb::ArmR),
    ("WT5500006888", Limb::ArmL),
    ("WT5500006705", Limb::ForearmR),
    ("WT5500006893", Limb::ForearmL),
    ("WT5500006886", Limb::HandR),
    ("WT5500006697", Limb::HandL),
    ("WT5500006696", Limb::ThighR),
    ("WT5500006895", Limb::ThighL),
    ("WT5500006903", Limb::CalfR),
    ("WT5500003998", Limb::CalfL),
    ("WT5500004016", Limb::FootR),
    ("WT5500003997", Limb::FootL),
];

static DEFAULT_REGISTRY: LazyLock<DeviceRegistry> = LazyLock::new(DeviceRegistry::azureloong);

/// Bijective device id <-> limb lookup
#[derive(Debug, Clone)]
pub struct DeviceRegistry {
    by_device: HashMap<&'static str, Limb>,
    by_limb: HashMap<Limb, &'static str>,
}

impl DeviceRegistry {
    /// Registry for the AzureLoong sensor suit
    pub fn azureloong() -> Self {
        let by_device: HashMap<_, _> = DEVICE_TABLE.iter().copied().collect();
        let by_limb: HashMap<_, _> = DEVICE_TABLE.iter().map(|&(id, limb)| (limb, id)).collect();
        debug_assert_eq!(by_device.len(), by_limb.len());
        debug_assert!(by_device.keys().all(|id| id.len() == DEVICE_ID_LEN));
        Self { by_device, by_limb }
    }

    /// Shared process-wide registry
    pub fn global() -> &'static Self {
        &DEFAULT_REGISTRY
    }

    /// Limb a device is bound to
    #[inline]
    pub fn limb_for(&self, device_id: &str) -> Option<Limb> {
        self.by_device.get(device_id).copied()
    }

    /// Device bound to a limb
    #[inline]
    pub fn device_for(&self, limb: Limb) -> Option<&'static str> {
        self.by_limb.get(&limb).copied()
    }

    /// `(device_id, limb)` pairs in topology order
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, Limb)> + '_ {
        Limb::ALL
            .into_iter()
            .filter_map(|limb| self.device_for(limb).map(|id| (id, limb)))
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::azureloong()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bijective() {
        let registry = DeviceRegistry::azureloong();
        assert_eq!(registry.entries().count(), 15);
        for limb in Limb::ALL {
            let id = registry.device_for(limb).unwrap();
            assert_eq!(registry.limb_for(id), Some(limb));
        }
    }

    #[test]
    fn test_known_bindings() {
        let registry = DeviceRegistry::global();
        assert_eq!(registry.limb_for("WT5500002652"), Some(Limb::Body));
        assert_eq!(registry.limb_for("WT5500003997"), Some(Limb::FootL));
        assert_eq!(registry.device_for(Limb::HandR), Some("WT5500006886"));
    }

    #[test]
    fn test_unknown_device() {
        let registry = DeviceRegistry::global();
        assert_eq!(registry.limb_for("WT5599999999"), None);
        assert_eq!(registry.limb_for("WT55"), None);
        assert_eq!(registry.limb_for(""), None);
    }

    #[test]
    fn test_entries_in_topology_order() {
        let limbs: Vec<Limb> = DeviceRegistry::global().entries().map(|(_, l)| l).collect();
        assert_eq!(limbs, Limb::ALL.to_vec());
    }
}
