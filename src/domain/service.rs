// ドメインサービス
// 複数の集約にまたがる純粋なビジネスロジックを実装

use crate::domain::error::DomainError;
use crate::domain::model::ProductId;
use crate::domain::port::StockDecrement;

/// 在庫需要
/// 1つの注文リクエスト内の商品別合計数量
/// 同一商品が複数明細に現れる場合は合算してから在庫と突き合わせる
/// （明細ごとに事前スナップショットへ検証すると合計で在庫を超えられるため）
#[derive(Debug, Clone, PartialEq)]
pub struct StockDemand {
    entries: Vec<StockDecrement>,
}

impl StockDemand {
    /// リクエストされた（商品ID, 数量）の列から在庫需要を構築する
    /// バリデーション:
    /// - 列は空でない
    /// - 各数量は1以上
    /// - 同一商品の合算がu32を超えない
    ///
    /// エントリは商品の初出順で保持される
    pub fn from_requests(requests: &[(ProductId, u32)]) -> Result<Self, DomainError> {
        if requests.is_empty() {
            return Err(DomainError::EmptyOrder);
        }

        let mut entries: Vec<StockDecrement> = Vec::new();
        for (product_id, quantity) in requests {
            if *quantity == 0 {
                return Err(DomainError::InvalidQuantity);
            }

            match entries.iter_mut().find(|e| e.product_id == *product_id) {
                Some(entry) => {
                    // 同一商品の重複明細は合算する
                    entry.quantity = entry
                        .quantity
                        .checked_add(*quantity)
                        .ok_or(DomainError::InvalidQuantity)?;
                }
                None => entries.push(StockDecrement {
                    product_id: *product_id,
                    quantity: *quantity,
                }),
            }
        }

        Ok(Self { entries })
    }

    /// 商品別に合算されたエントリを取得（商品の初出順）
    pub fn entries(&self) -> &[StockDecrement] {
        &self.entries
    }

    /// 需要に含まれる相異なる商品IDを取得
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.entries.iter().map(|e| e.product_id).collect()
    }
}
