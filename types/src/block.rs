use serde::{Deserialize, Serialize};

use crate::{Address, PublicKey, RideObject};

/// Header fields of a block as scripts see them.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BlockInfo {
    /// Block timestamp in milliseconds.
    pub timestamp: u64,
    /// Block height.
    pub height: u64,
    /// Consensus base target.
    pub base_target: i64,
    /// Generation signature.
    pub generation_signature: Vec<u8>,
    /// Address of the block generator.
    pub generator: Address,
    /// Public key of the block generator.
    pub generator_public_key: PublicKey,
    /// VRF output, present from block version 5.
    pub vrf: Option<Vec<u8>>,
}

impl BlockInfo {
    /// Builds the `BlockInfo` object.
    pub fn to_ride_object(&self) -> RideObject {
        RideObject::new("BlockInfo")
            .with("timestamp", self.timestamp)
            .with("height", self.height)
            .with("baseTarget", self.base_target)
            .with("generationSignature", self.generation_signature.clone())
            .with("generator", self.generator)
            .with("generatorPublicKey", self.generator_public_key)
            .with("vrf", self.vrf.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RideValue;

    #[test]
    fn out_of_range_timestamp_should_saturate() {
        let generator_public_key = PublicKey::new([3; 32]);
        let block = BlockInfo {
            timestamp: u64::MAX,
            height: 42,
            base_target: 60,
            generation_signature: vec![1, 2, 3],
            generator: Address::from_public_key(b'T', &generator_public_key),
            generator_public_key,
            vrf: None,
        };

        let object = block.to_ride_object();

        assert_eq!(object.get("timestamp"), Some(&RideValue::Int(i64::MAX)));
        assert_eq!(object.get("height"), Some(&RideValue::Int(42)));
    }
}
