use serde::{Deserialize, Serialize};

use super::{BranchCode, CapacityError, HoldingId};

/// 分館ごとの所蔵状況（librarycatalogue の1行）
///
/// 不変条件：copies_available <= num_holdings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueEntry {
    pub branch: BranchCode,
    pub holding_id: HoldingId,
    pub num_holdings: i32,
    pub copies_available: i32,
}

impl CatalogueEntry {
    /// 返却された1冊を利用可能冊数に戻す
    ///
    /// # エラー
    /// 戻すと所蔵冊数を超える場合は`CapacityError::CapacityExceeded`を返す
    pub fn return_copy(self) -> Result<Self, CapacityError> {
        if self.copies_available >= self.num_holdings {
            return Err(CapacityError::CapacityExceeded);
        }
        Ok(Self {
            copies_available: self.copies_available + 1,
            ..self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(num_holdings: i32, copies_available: i32) -> CatalogueEntry {
        CatalogueEntry {
            branch: BranchCode::new("DM"),
            holding_id: HoldingId::new(1),
            num_holdings,
            copies_available,
        }
    }

    #[test]
    fn test_return_copy_increments_available() {
        let updated = entry(3, 1).return_copy().unwrap();
        assert_eq!(updated.copies_available, 2);
        assert_eq!(updated.num_holdings, 3);
    }

    #[test]
    fn test_return_copy_up_to_capacity() {
        let updated = entry(3, 2).return_copy().unwrap();
        assert_eq!(updated.copies_available, 3);
    }

    #[test]
    fn test_return_copy_fails_when_full() {
        let result = entry(3, 3).return_copy();
        assert_eq!(result, Err(CapacityError::CapacityExceeded));
    }
}
