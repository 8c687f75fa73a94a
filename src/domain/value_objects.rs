use serde::{Deserialize, Serialize};

/// 利用者カード番号 - 利用者（patron）の一意な識別子
///
/// 先頭ゼロが意味を持つため、数値ではなく文字列として保持する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardNumber(String);

impl CardNumber {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CardNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// イベントID - 図書館イベントへの参照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(i32);

impl EventId {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 貸出ID - 1冊の資料の1回の貸出（checkout）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckoutId(i32);

impl CheckoutId {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for CheckoutId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 所蔵資料ID - カタログ上の作品（holding）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HoldingId(i32);

impl HoldingId {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

/// 分館コード - 図書館の各分館を表す一意なコード（例: "DM"）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchCode(String);

impl BranchCode {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 検索結果の1件
///
/// 同じタイトルの別資料を区別するため、タイトルと資料IDの組で保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingTitle {
    pub holding_id: HoldingId,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_number_keeps_leading_zeros() {
        let card = CardNumber::new("02953575718");
        assert_eq!(card.as_str(), "02953575718");
        assert_eq!(card.to_string(), "02953575718");
    }

    #[test]
    fn test_event_id_value() {
        let id = EventId::new(77);
        assert_eq!(id.value(), 77);
        assert_eq!(id, EventId::new(77));
    }

    #[test]
    fn test_checkout_id_display() {
        assert_eq!(CheckoutId::new(94).to_string(), "94");
    }
}
