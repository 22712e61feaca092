//! 회사명 자동완성용 prefix 인덱스.
//!
//! 추적 중인 회사명 전체를 메모리에 올려 두고 prefix 질의에 답하는 trie입니다.
//! 조회 비용은 O(키워드 길이 + 결과 수)로 전체 회사 수와 무관합니다.
//!
//! 이 인덱스는 보조 구조입니다. 저장소의 회사명 집합과 일치해야 하지만,
//! 불일치는 자동완성 제안이 더해지거나 빠지는 수준으로만 허용되며
//! 쓰기 경로의 존재 여부 판단에는 절대 사용하지 않습니다.

use std::collections::HashMap;

#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<char, TrieNode>,
    /// 이 노드에서 끝나는 회사명 (원본 표기 유지).
    /// 소문자 키가 같은 서로 다른 표기가 공존할 수 있습니다.
    names: Vec<String>,
}

/// 회사명 trie.
///
/// 키는 소문자로 정규화해 탐색하고, 결과는 삽입 당시의 원본 표기로 돌려줍니다.
#[derive(Debug, Default)]
pub struct CompanyNameTrie {
    root: TrieNode,
    len: usize,
}

impl CompanyNameTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// 등록된 회사명 수.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 회사명을 인덱스에 추가합니다.
    ///
    /// 동일한 이름을 다시 추가해도 항목이 중복되지 않습니다.
    pub fn insert(&mut self, name: &str) {
        let mut node = &mut self.root;
        for ch in name.chars().flat_map(|c| c.to_lowercase()) {
            node = node.children.entry(ch).or_default();
        }
        if !node.names.iter().any(|n| n == name) {
            node.names.push(name.to_string());
            self.len += 1;
        }
    }

    /// 회사명을 인덱스에서 제거합니다.
    ///
    /// 등록되지 않은 이름이면 false를 반환합니다. 빈 가지는 정리해
    /// 삭제가 누적되어도 메모리가 새지 않도록 합니다.
    pub fn remove(&mut self, name: &str) -> bool {
        let key: Vec<char> = name.chars().flat_map(|c| c.to_lowercase()).collect();
        let removed = Self::remove_rec(&mut self.root, &key, name);
        if removed {
            self.len -= 1;
        }
        removed
    }

    fn remove_rec(node: &mut TrieNode, key: &[char], name: &str) -> bool {
        match key.split_first() {
            None => {
                let before = node.names.len();
                node.names.retain(|n| n != name);
                node.names.len() < before
            }
            Some((ch, rest)) => {
                let Some(child) = node.children.get_mut(ch) else {
                    return false;
                };
                let removed = Self::remove_rec(child, rest, name);
                if removed && child.names.is_empty() && child.children.is_empty() {
                    node.children.remove(ch);
                }
                removed
            }
        }
    }

    /// 주어진 키워드로 시작하는 모든 회사명을 반환합니다.
    ///
    /// 대소문자를 구분하지 않으며, 순서는 보장하지 않습니다.
    /// 일치하는 이름이 없으면 빈 Vec을 반환합니다. 비어 있음은 조회 실패가 아니라
    /// 유효한 결과이며, 호출자가 `EmptyResult`로 구분해 보고합니다.
    pub fn prefix_search(&self, keyword: &str) -> Vec<String> {
        let mut node = &self.root;
        for ch in keyword.chars().flat_map(|c| c.to_lowercase()) {
            match node.children.get(&ch) {
                Some(child) => node = child,
                None => return Vec::new(),
            }
        }

        let mut results = Vec::new();
        Self::collect(node, &mut results);
        results
    }

    fn collect(node: &TrieNode, out: &mut Vec<String>) {
        out.extend(node.names.iter().cloned());
        for child in node.children.values() {
            Self::collect(child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> CompanyNameTrie {
        let mut trie = CompanyNameTrie::new();
        trie.insert("Citigroup Inc.");
        trie.insert("Coca-Cola Consolidated, Inc.");
        trie.insert("3M Company");
        trie
    }

    #[test]
    fn test_prefix_search_returns_exact_subset() {
        let trie = catalog();
        let mut results = trie.prefix_search("C");
        results.sort();

        assert_eq!(
            results,
            vec![
                "Citigroup Inc.".to_string(),
                "Coca-Cola Consolidated, Inc.".to_string()
            ]
        );
    }

    #[test]
    fn test_prefix_search_case_insensitive() {
        let trie = catalog();
        assert_eq!(trie.prefix_search("citi"), vec!["Citigroup Inc.".to_string()]);
        assert_eq!(trie.prefix_search("CITI"), vec!["Citigroup Inc.".to_string()]);
    }

    #[test]
    fn test_prefix_search_empty_iff_no_match() {
        let trie = catalog();
        assert!(trie.prefix_search("Z").is_empty());
        assert!(!trie.prefix_search("3").is_empty());
    }

    #[test]
    fn test_full_name_is_its_own_prefix() {
        let trie = catalog();
        assert_eq!(trie.prefix_search("3M Company"), vec!["3M Company".to_string()]);
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut trie = CompanyNameTrie::new();
        trie.insert("3M Company");
        trie.insert("3M Company");

        assert_eq!(trie.len(), 1);
        assert_eq!(trie.prefix_search("3M").len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut trie = catalog();
        assert!(trie.remove("Citigroup Inc."));
        assert!(!trie.remove("Citigroup Inc."));

        assert_eq!(
            trie.prefix_search("C"),
            vec!["Coca-Cola Consolidated, Inc.".to_string()]
        );
        assert_eq!(trie.len(), 2);
    }

    #[test]
    fn test_remove_keeps_longer_names_sharing_prefix() {
        let mut trie = CompanyNameTrie::new();
        trie.insert("Visa");
        trie.insert("Visa Inc.");

        assert!(trie.remove("Visa"));
        assert_eq!(trie.prefix_search("Vis"), vec!["Visa Inc.".to_string()]);
    }

    #[test]
    fn test_same_lowercase_different_casing() {
        let mut trie = CompanyNameTrie::new();
        trie.insert("ABC Corp");
        trie.insert("abc corp");

        assert_eq!(trie.len(), 2);
        assert_eq!(trie.prefix_search("abc").len(), 2);

        assert!(trie.remove("ABC Corp"));
        assert_eq!(trie.prefix_search("abc"), vec!["abc corp".to_string()]);
    }
}
