//! End-to-end tests for the seed pipeline with a scripted command runner

use std::fs;
use std::sync::Mutex;
use tempfile::TempDir;
use tusk::config::{ProjectLayout, TuskConfig};
use tusk::generator::GeneratorRegistry;
use tusk::ordering::{Bucket, PrefixAllocator};
use tusk::process::{CommandOutput, CommandRunner, ProcessError};
use tusk::report::{Outcome, RunReport};
use tusk::seeder::{SeedOptions, Seeder};

/// Answers `pg_dump` calls from a fixed script and records every call
struct ScriptedRunner {
    calls: Mutex<Vec<(String, Vec<String>)>>,
    respond: Box<dyn Fn(&[String]) -> Result<String, String> + Sync>,
}

impl ScriptedRunner {
    fn new(respond: impl Fn(&[String]) -> Result<String, String> + Sync + 'static) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(
        &self,
        command: &str,
        args: &[String],
        _env: &[(String, String)],
    ) -> Result<CommandOutput, ProcessError> {
        self.calls
            .lock()
            .unwrap()
            .push((command.to_string(), args.to_vec()));
        match (self.respond)(args) {
            Ok(stdout) => Ok(CommandOutput {
                stdout,
                stderr: String::new(),
            }),
            Err(stderr) => Err(ProcessError::Exit {
                command: command.to_string(),
                code: Some(1),
                stdout: String::new(),
                stderr,
            }),
        }
    }
}

fn dump_rows(args: &[String]) -> Result<String, String> {
    let table = args
        .iter()
        .position(|a| a == "-t")
        .and_then(|i| args.get(i + 1))
        .cloned()
        .unwrap_or_default();
    Ok(format!("INSERT INTO {} VALUES (1);", table))
}

struct Project {
    dir: TempDir,
    layout: ProjectLayout,
}

impl Project {
    fn new(config: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("tusk.yaml"), config).unwrap();
        let layout = ProjectLayout::new(dir.path());
        Self { dir, layout }
    }

    fn config(&self) -> TuskConfig {
        TuskConfig::load(&self.layout.config_path()).unwrap()
    }

    fn write(&self, rel: &str, content: &str) {
        let path = self.dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn artifact(&self, name: &str) -> String {
        fs::read_to_string(self.layout.artifact_dir().join(name)).unwrap()
    }

    fn seed(&self, runner: &ScriptedRunner, options: SeedOptions) -> (RunReport, PrefixAllocator) {
        let config = self.config();
        let registry = GeneratorRegistry::with_builtins();
        let allocator = PrefixAllocator::new();
        let report = Seeder::new(&config, &self.layout, runner, &registry, &allocator, options)
            .run()
            .unwrap();
        (report, allocator)
    }
}

const FAKER_CONFIG: &str = r#"
faker_configs:
  users: templates/faker/users.yaml
databases:
  - source_name: app
    local_target_name: app_local
    host: db.example.com
    username: reader
    seed_tables:
      - table: public.users
        method: faker
        rows: 3
        faker_config_ref: users
"#;

#[test]
fn test_faker_rows_inside_replica_toggle() {
    let project = Project::new(FAKER_CONFIG);
    project.write(
        "templates/faker/users.yaml",
        "columns:\n  id: string.uuid\n  email: internet.email\n",
    );
    let runner = ScriptedRunner::new(dump_rows);

    let (report, _) = project.seed(&runner, SeedOptions::default());
    assert_eq!(report.summary().written, 1);
    assert_eq!(runner.call_count(), 0);

    let sql = project.artifact("800__db_example_com__app_local__public_users.sql");
    let lines: Vec<&str> = sql.lines().collect();
    let on = lines
        .iter()
        .position(|l| *l == "SET session_replication_role = 'replica';")
        .unwrap();
    let off = lines
        .iter()
        .position(|l| *l == "SET session_replication_role = 'origin';")
        .unwrap();

    let inserts: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|l| l.starts_with("INSERT INTO public.users (id, email) VALUES ("))
        .collect();
    assert_eq!(inserts.len(), 3);
    assert_eq!(off - on - 1, 3);

    // uuids never repeat
    assert_ne!(inserts[0], inserts[1]);
    assert_ne!(inserts[1], inserts[2]);
}

#[test]
fn test_missing_definition_is_scaffolded_and_used() {
    let project = Project::new(FAKER_CONFIG);
    let runner = ScriptedRunner::new(dump_rows);

    let (report, _) = project.seed(&runner, SeedOptions::default());
    assert_eq!(report.summary().written, 1);

    let scaffold = fs::read_to_string(project.dir.path().join("templates/faker/users.yaml")).unwrap();
    assert!(scaffold.contains("email: internet.email"));
    let sql = project.artifact("800__db_example_com__app_local__public_users.sql");
    assert!(sql.contains("INSERT INTO public.users (id, name, email, created_at) VALUES ("));
}

#[test]
fn test_dry_run_writes_nothing() {
    let project = Project::new(FAKER_CONFIG);
    let runner = ScriptedRunner::new(dump_rows);

    let (report, _) = project.seed(
        &runner,
        SeedOptions {
            dry_run: true,
            ..Default::default()
        },
    );
    assert_eq!(report.summary().dry_run, 1);
    assert!(!project.layout.artifact_dir().exists());
    assert!(!project.dir.path().join("templates/faker/users.yaml").exists());
}

const MIXED_CONFIG: &str = r#"
databases:
  - source_name: shop
    local_target_name: shop_local
    host: db.example.com
    username: reader
    seed_tables:
      - { table: public.customers, method: dump }
      - { table: public.orders, method: dump }
      - { table: public.legacy, method: rsync }
      - { table: public.countries, method: csv }
      - { table: public.reports, method: query }
      - { table: public.invoices, method: dump }
"#;

#[test]
fn test_dump_csv_and_missing_query_template() {
    let project = Project::new(MIXED_CONFIG);
    let runner = ScriptedRunner::new(dump_rows);

    let (report, allocator) = project.seed(&runner, SeedOptions::default());
    let summary = report.summary();
    assert_eq!(summary.written, 4);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(runner.call_count(), 3);

    let dump = project.artifact("400__db_example_com__shop_local__public_customers.sql");
    assert_eq!(
        dump,
        "SET session_replication_role = 'replica';\n\
         INSERT INTO public.customers VALUES (1);\n\
         SET session_replication_role = 'origin';\n"
    );

    let csv = project.artifact("600__db_example_com__shop_local__public_countries.sql");
    assert!(csv.starts_with("\\copy public.countries FROM 'templates/csv/countries.csv'"));

    // rsync consumed nothing; the query skip still holds its slot
    assert!(project
        .layout
        .artifact_dir()
        .join("402__db_example_com__shop_local__public_invoices.sql")
        .exists());
    assert_eq!(allocator.allocated(Bucket::Dump), 3);
    assert_eq!(allocator.allocated(Bucket::Query), 2);

    let items: Vec<_> = report.items().collect();
    assert!(matches!(&items[2].outcome, Outcome::Skipped { reason } if reason.contains("rsync")));
    assert!(items[2].prefix.is_none());
    assert!(
        matches!(&items[4].outcome, Outcome::Skipped { reason } if reason.contains("Query file not found"))
    );
}

#[test]
fn test_query_template_copied_verbatim() {
    let project = Project::new(MIXED_CONFIG);
    let template = "-- hand written\nINSERT INTO public.reports VALUES (42);\n";
    project.write("templates/queries/public_reports.sql", template);
    let runner = ScriptedRunner::new(dump_rows);

    project.seed(&runner, SeedOptions::default());
    assert_eq!(
        project.artifact("601__db_example_com__shop_local__public_reports.sql"),
        template
    );
}

#[test]
fn test_failed_directive_does_not_consume_prefix() {
    let project = Project::new(MIXED_CONFIG);
    let runner = ScriptedRunner::new(|args| {
        if args.iter().any(|a| a == "public.orders") {
            Err("permission denied for table orders".to_string())
        } else {
            dump_rows(args)
        }
    });

    let (report, allocator) = project.seed(&runner, SeedOptions::default());
    assert_eq!(report.summary().failed, 1);
    assert_eq!(allocator.allocated(Bucket::Dump), 2);

    let failed = report
        .items()
        .find(|i| i.item == "public.orders")
        .unwrap();
    assert!(failed.prefix.is_none());
    assert!(matches!(&failed.outcome, Outcome::Failed { error } if error.contains("permission denied")));

    let invoices = report
        .items()
        .find(|i| i.item == "public.invoices")
        .unwrap();
    assert_eq!(invoices.prefix.as_deref(), Some("401"));
    assert!(project
        .layout
        .artifact_dir()
        .join("401__db_example_com__shop_local__public_invoices.sql")
        .exists());
}

#[test]
fn test_failed_dump_and_faker_leave_counters_unchanged() {
    let project = Project::new(
        r#"
faker_configs:
  f2: templates/faker/f2.yaml
databases:
  - source_name: src
    local_target_name: l
    host: h
    username: u
    seed_tables:
      - { table: public.bad, method: dump }
      - { table: public.good, method: dump }
      - { table: public.f, method: faker }
      - { table: public.f2, method: faker, rows: 1, faker_config_ref: f2 }
"#,
    );
    let runner = ScriptedRunner::new(|args| {
        if args.iter().any(|a| a == "public.bad") {
            Err("relation does not exist".to_string())
        } else {
            dump_rows(args)
        }
    });

    let (report, _) = project.seed(&runner, SeedOptions::default());
    assert_eq!(report.summary().failed, 2);

    let mut names: Vec<String> = fs::read_dir(project.layout.artifact_dir())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["400__h__l__public_good.sql", "800__h__l__public_f2.sql"]);
}

#[test]
fn test_locked_artifact_is_not_regenerated() {
    let project = Project::new(MIXED_CONFIG);
    let locked = "-- @lock\nINSERT INTO public.customers VALUES (99);\n";
    project.write(
        "infrastructure/volume-mounts/ddl/400__db_example_com__shop_local__public_customers.sql",
        locked,
    );
    let runner = ScriptedRunner::new(dump_rows);

    let (report, _) = project.seed(&runner, SeedOptions::default());
    assert_eq!(report.summary().locked, 1);
    assert_eq!(
        project.artifact("400__db_example_com__shop_local__public_customers.sql"),
        locked
    );

    let (report, _) = project.seed(
        &runner,
        SeedOptions {
            force: true,
            ..Default::default()
        },
    );
    assert_eq!(report.summary().locked, 0);
    assert!(project
        .artifact("400__db_example_com__shop_local__public_customers.sql")
        .contains("VALUES (1)"));
}

#[test]
fn test_unknown_database_filter_is_fatal() {
    let project = Project::new(MIXED_CONFIG);
    let config = project.config();
    let registry = GeneratorRegistry::with_builtins();
    let allocator = PrefixAllocator::new();
    let runner = ScriptedRunner::new(dump_rows);
    let options = SeedOptions {
        database: Some("nope".to_string()),
        ..Default::default()
    };

    let result = Seeder::new(&config, &project.layout, &runner, &registry, &allocator, options).run();
    assert!(result.is_err());
    assert_eq!(runner.call_count(), 0);
}
