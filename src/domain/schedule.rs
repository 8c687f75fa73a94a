use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::EventId;

/// イベントの開催回（eventschedule の1行）
///
/// 時間帯は半開区間 [start_time, end_time) として扱う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub event_id: EventId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl Occurrence {
    /// 2つの開催回が重なるか
    ///
    /// 同じ日付で、かつ時間帯が交差する場合のみ重なりとみなす。
    /// 一方の終了時刻ともう一方の開始時刻が一致する連続した開催回は重ならない。
    pub fn overlaps(&self, other: &Occurrence) -> bool {
        self.date == other.date
            && self.start_time < other.end_time
            && self.end_time > other.start_time
    }
}

/// スケジュールの衝突
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConflict {
    /// 申込もうとしているイベントの開催回
    pub requested: Occurrence,
    /// 既に申込済みのイベントの開催回
    pub existing: Occurrence,
}

/// 既存の申込と新しいイベントの開催回を突き合わせ、最初の衝突を返す（純粋な関数）
pub fn find_conflict(
    existing: &[Occurrence],
    requested: &[Occurrence],
) -> Option<ScheduleConflict> {
    requested.iter().find_map(|new| {
        existing
            .iter()
            .find(|old| new.overlaps(old))
            .map(|old| ScheduleConflict {
                requested: *new,
                existing: *old,
            })
    })
}
