#[cfg(test)]
mod tests {
    use botdb::{AsValue, GenericSqlWriter, SqlWriter, Value, Where};

    fn render(filter: &Where) -> String {
        let mut out = String::new();
        GenericSqlWriter.write_where(&mut out, filter);
        out
    }

    #[test]
    fn where_single() {
        let filter = Where::new().eq("name", "ferris");
        assert_eq!(render(&filter), " WHERE name = $name");
        assert_eq!(
            filter.parameters().get("$name"),
            Some(&Value::Varchar(Some("ferris".into())))
        );
    }

    #[test]
    fn where_equal_and_or() {
        let filter = Where::new()
            .eq("id", 1)
            .or(|w| w.eq("id", 2).eq("id", 3));
        assert_eq!(render(&filter), " WHERE (id = $id) AND (id = $id1 OR id = $id2)");
        let parameters: Vec<_> = filter
            .parameters()
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .collect();
        assert_eq!(
            parameters,
            [
                ("$id", 1i64.as_value()),
                ("$id1", 2i64.as_value()),
                ("$id2", 3i64.as_value()),
            ]
        );
    }

    #[test]
    fn where_lists() {
        let filter = Where::new()
            .is_in("nick", ["ferris", "crab"])
            .not_in("network", ["efnet"]);
        assert_eq!(
            render(&filter),
            " WHERE (nick IN ($nick, $nick1)) AND (network NOT IN ($network))"
        );
        assert_eq!(filter.parameters().len(), 3);
        let empty = Where::new().is_in("nick", Vec::<String>::new());
        assert_eq!(render(&empty), " WHERE nick IN ()");
        assert!(empty.parameters().is_empty());
    }

    #[test]
    fn where_nested_groups() {
        let filter = Where::new().or(|w| {
            w.and(|w| w.eq("a", 1).eq("b", 2))
                .and(|w| w.eq("a", 3).or(|w| w.eq("b", 4).eq("c", 5)))
        });
        assert_eq!(
            render(&filter),
            " WHERE (a = $a AND b = $b) OR (a = $a1 AND (b = $b1 OR c = $c))"
        );
        assert_eq!(filter.parameters().len(), 5);
        assert_eq!(filter.parameters().get("$b1"), Some(&4i64.as_value()));
    }

    #[test]
    fn where_keys_unique_at_any_depth() {
        let filter = Where::new()
            .eq("x", 0)
            .or(|w| w.eq("x", 1).and(|w| w.eq("x", 2).is_in("x", [3, 4])));
        let keys: Vec<_> = filter.parameters().keys().cloned().collect();
        assert_eq!(keys, ["$x", "$x1", "$x2", "$x3", "$x4"]);
        assert_eq!(
            render(&filter),
            " WHERE (x = $x) AND (x = $x1 OR (x = $x2 AND x IN ($x3, $x4)))"
        );
    }

    #[test]
    fn where_empty_groups_are_skipped() {
        assert_eq!(render(&Where::new()), "");
        assert_eq!(render(&Where::new().and(|w| w).or(|w| w)), "");
        assert_eq!(
            render(&Where::new().eq("a", 1).and(|w| w)),
            " WHERE a = $a"
        );
    }

    #[test]
    fn where_reserved_keys() {
        let mut filter = Where::new();
        filter.reserve("$karma");
        let filter = filter.eq("karma", 1);
        assert_eq!(render(&filter), " WHERE karma = $karma1");
    }

    #[test]
    fn where_odd_columns() {
        let filter = Where::new().eq("user name", "x").eq("order", 1);
        assert_eq!(
            render(&filter),
            r#" WHERE ("user name" = $user_name) AND ("order" = $order)"#
        );
    }

    #[test]
    fn where_display() {
        let filter = Where::new().eq("a", true);
        assert_eq!(filter.to_string(), " WHERE a = $a");
    }
}
