use crate::models::{DeviceOwnerTable, DeviceTable, EventTable, ScheduleTable, Table, UserTable};

pub struct SchemaManager {
    tables: Vec<Box<dyn Table>>,
}

impl SchemaManager {
    pub fn new(mut tables: Vec<Box<dyn Table>>) -> Self {
        Self::sort_tables(&mut tables);
        Self { tables }
    }

    fn sort_tables(tables: &mut Vec<Box<dyn Table>>) {
        let mut to_sort = std::mem::take(tables);
        let mut deps_list: Vec<_> = to_sort.iter().map(|t| t.dependencies()).collect();
        let mut sorted = Vec::with_capacity(to_sort.len());

        while !to_sort.is_empty() {
            let independent_indices: Vec<usize> = deps_list.iter().enumerate()
                .filter(|(_, deps)| deps.is_empty())
                .map(|(i, _)| i)
                .collect();

            assert!(!independent_indices.is_empty(), "Circular dependency detected or unresolved dependencies exist.");

            for &index in independent_indices.iter().rev() {
                let table = to_sort.swap_remove(index);
                let _ = deps_list.swap_remove(index);
                sorted.push(table);
            }

            for deps in deps_list.iter_mut() {
                deps.retain(|dep_name| {
                    !sorted.iter().any(|resolved_table| resolved_table.name() == *dep_name)
                });
            }
        }

        *tables = sorted;
    }

    pub fn create_schema(&self) -> Vec<String> {
        self.tables.iter().map(|table| table.create()).collect()
    }

    pub fn dispose_schema(&self) -> Vec<String> {
        self.tables.iter().rev().map(|table| table.dispose()).collect()
    }
}

impl Default for SchemaManager {
    fn default() -> Self {
        SchemaManager::new(vec![
            Box::new(UserTable),
            Box::new(DeviceTable),
            // Reference
            Box::new(DeviceOwnerTable),
            Box::new(ScheduleTable),
            Box::new(EventTable),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockTable {
        name: &'static str,
        dependencies: Vec<&'static str>,
    }

    impl Table for MockTable {
        fn name(&self) -> &'static str {
            self.name
        }

        fn create(&self) -> String {
            format!("CREATE TABLE {};", self.name)
        }

        fn dispose(&self) -> String {
            format!("DROP TABLE {};", self.name)
        }

        fn dependencies(&self) -> Vec<&'static str> {
            self.dependencies.clone()
        }
    }

    fn mock(name: &'static str, dependencies: Vec<&'static str>) -> Box<dyn Table> {
        Box::new(MockTable { name, dependencies })
    }

    #[test]
    fn test_correct_creation_order() {
        let manager = SchemaManager::new(vec![
            mock("events", vec!["devices_owners_link"]),
            mock("devices_owners_link", vec!["users", "devices"]),
            mock("devices", vec![]),
            mock("users", vec![]),
        ]);
        let statements = manager.create_schema();

        let position = |table: &str| {
            statements
                .iter()
                .position(|s| s == &format!("CREATE TABLE {table};"))
                .unwrap()
        };

        assert!(position("users") < position("devices_owners_link"));
        assert!(position("devices") < position("devices_owners_link"));
        assert_eq!(statements[3], "CREATE TABLE events;");
    }

    #[test]
    fn test_dispose_in_reverse_order() {
        let manager = SchemaManager::default();
        let statements = manager.dispose_schema();

        let link = statements.iter().position(|s| s.contains("devices_owners_link")).unwrap();
        let devices = statements.iter().position(|s| s.contains("EXISTS devices;")).unwrap();
        let schedules = statements.iter().position(|s| s.contains("schedules")).unwrap();

        assert!(schedules < link);
        assert!(link < devices);
    }
}
