//! Query construction - translates typed parameters into search bodies / 查询构造
//!
//! 每个函数都是纯函数，只负责拼装查询 DSL，不访问引擎 / every function here is
//! pure: it assembles the query DSL and never talks to the engine. The
//! returned body is handed to [`super::ProductIndex::search`] as-is.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value};

/// 通配符查询返回的最大条数 / maximum hits returned by the wildcard search
pub const WILDCARD_RESULT_LIMIT: usize = 5;

/// 模糊查询固定编辑距离 / fixed edit distance for the fuzzy search
const FUZZY_EDIT_DISTANCE: u8 = 1;
/// 模糊查询不参与模糊的前缀长度 / leading characters excluded from fuzzing
const FUZZY_PREFIX_LENGTH: u8 = 3;

/// 查询全部商品 / match every product (page size stays the engine default)
pub fn match_all() -> Value {
    json!({
        "query": {
            "match_all": {}
        }
    })
}

/// 按名称分词匹配 / tokenized match on `name`
pub fn name_match(name: &str) -> Value {
    json!({
        "query": {
            "match": {
                "name": name
            }
        }
    })
}

/// 按是否有货精确过滤 / exact term filter on the boolean `inStock` field
pub fn in_stock_term(in_stock: bool) -> Value {
    json!({
        "query": {
            "term": {
                "inStock": in_stock
            }
        }
    })
}

/// 价格闭区间查询 / inclusive price range, both ends included
pub fn price_range(min_price: Decimal, max_price: Decimal) -> Value {
    json!({
        "query": {
            "range": {
                "price": {
                    "gte": price_value(min_price),
                    "lte": price_value(max_price)
                }
            }
        }
    })
}

/// 名称前缀通配符查询，最多返回5条 / lower-cased `<term>*` wildcard on `name`
///
/// `name` 字段经过分词后为小写词元，查询词必须先转小写 / the field is analyzed
/// into lowercase tokens, so the pattern has to be lower-cased to match.
pub fn name_wildcard(name: &str) -> Value {
    let pattern = format!("{}*", name.to_lowercase());
    json!({
        "query": {
            "wildcard": {
                "name": {
                    "value": pattern
                }
            }
        },
        "size": WILDCARD_RESULT_LIMIT
    })
}

/// 名称模糊匹配，编辑距离1，前3个字符不模糊 / fuzzy match on `name` with a
/// fixed edit distance of 1 and a 3-character unfuzzed prefix
pub fn name_fuzzy(name: &str) -> Value {
    json!({
        "query": {
            "match": {
                "name": {
                    "query": name,
                    "fuzziness": FUZZY_EDIT_DISTANCE,
                    "prefix_length": FUZZY_PREFIX_LENGTH
                }
            }
        }
    })
}

/// 单串跨字段匹配 / one query string matched across `category` and `name`
pub fn multi_match(text: &str) -> Value {
    json!({
        "query": {
            "multi_match": {
                "query": text,
                "fields": ["category", "name"]
            }
        }
    })
}

/// 组合布尔查询 / boolean combination
///
/// must: 精确分类；should: 价格低于上限、是否有货。should 子句只加分不过滤，
/// 两个可选条件都不满足的文档仍可命中 / the should clauses boost without
/// filtering, so a document matching only the must clause still qualifies.
pub fn bool_combination(category: &str, max_price: Decimal, in_stock: bool) -> Value {
    json!({
        "query": {
            "bool": {
                "must": [
                    { "term": { "category": category } }
                ],
                "should": [
                    { "range": { "price": { "lt": price_value(max_price) } } },
                    { "term": { "inStock": in_stock } }
                ]
            }
        }
    })
}

/// 按分类统计平均价格 / terms bucket per category with an average-price
/// sub-aggregation
pub fn avg_price_per_category() -> Value {
    json!({
        "size": 0,
        "query": {
            "match_all": {}
        },
        "aggs": {
            "by_category": {
                "terms": { "field": "category" },
                "aggs": {
                    "avg_price": {
                        "avg": { "field": "price" }
                    }
                }
            }
        }
    })
}

/// 按分类统计文档数 / terms bucket per category, doc counts only
pub fn count_per_category() -> Value {
    json!({
        "size": 0,
        "query": {
            "match_all": {}
        },
        "aggs": {
            "by_category": {
                "terms": { "field": "category" }
            }
        }
    })
}

/// Decimal 价格转查询 DSL 中的数值 / price as a JSON number for the DSL
fn price_value(price: Decimal) -> f64 {
    price.to_f64().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_name_match() {
        let body = name_match("Shoe");
        assert_eq!(body["query"]["match"]["name"], "Shoe");
    }

    #[test]
    fn test_in_stock_term() {
        let body = in_stock_term(true);
        assert_eq!(body["query"]["term"]["inStock"], true);
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let body = price_range(dec("10.5"), dec("99.5"));
        let range = &body["query"]["range"]["price"];
        // 闭区间，两端都包含
        assert_eq!(range["gte"], 10.5);
        assert_eq!(range["lte"], 99.5);
        assert!(range.get("gt").is_none());
        assert!(range.get("lt").is_none());
    }

    #[test]
    fn test_wildcard_lowercases_and_limits() {
        let body = name_wildcard("Sh");
        assert_eq!(body["query"]["wildcard"]["name"]["value"], "sh*");
        assert_eq!(body["size"], 5);
    }

    #[test]
    fn test_fuzzy_uses_fixed_policy() {
        let body = name_fuzzy("Shoee");
        let clause = &body["query"]["match"]["name"];
        assert_eq!(clause["query"], "Shoee");
        assert_eq!(clause["fuzziness"], 1);
        assert_eq!(clause["prefix_length"], 3);
    }

    #[test]
    fn test_multi_match_fields() {
        let body = multi_match("footwear");
        let clause = &body["query"]["multi_match"];
        assert_eq!(clause["query"], "footwear");
        assert_eq!(clause["fields"], json!(["category", "name"]));
    }

    #[test]
    fn test_bool_combination_clauses() {
        let body = bool_combination("footwear", dec("100"), true);
        let bool_query = &body["query"]["bool"];

        assert_eq!(bool_query["must"][0]["term"]["category"], "footwear");
        // should 子句只加分不过滤
        assert_eq!(bool_query["should"][0]["range"]["price"]["lt"], 100.0);
        assert_eq!(bool_query["should"][1]["term"]["inStock"], true);
        assert!(bool_query.get("filter").is_none());
    }

    #[test]
    fn test_aggregation_bodies() {
        let avg = avg_price_per_category();
        assert_eq!(avg["size"], 0);
        assert_eq!(avg["aggs"]["by_category"]["terms"]["field"], "category");
        assert_eq!(
            avg["aggs"]["by_category"]["aggs"]["avg_price"]["avg"]["field"],
            "price"
        );

        let count = count_per_category();
        assert_eq!(count["aggs"]["by_category"]["terms"]["field"], "category");
        assert!(count["aggs"]["by_category"].get("aggs").is_none());
    }
}
