//! Unit tests for the dispatch loop

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {
    use anyhow::bail;
    use clap::{Arg, ArgAction};
    use cmdchain::command::{Command, Flags};
    use cmdchain::dispatch::{Dispatcher, ParseErrorPolicy, Registry};
    use cmdchain::error::ChainError;
    use cmdchain::runtime::{CancelToken, WaitGroup, Waiter};
    use cmdchain::system::MockSystem;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    /// Shared record of what the scripted commands did
    #[derive(Clone, Default)]
    struct Log(Arc<Mutex<Vec<String>>>);

    impl Log {
        fn push(&self, entry: String) {
            self.0.lock().unwrap().push(entry);
        }

        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }

        fn with_prefix(&self, prefix: &str) -> Vec<String> {
            self.entries()
                .into_iter()
                .filter(|entry| entry.starts_with(prefix))
                .collect()
        }
    }

    /// Command that records its parse and run, with switches to fail,
    /// panic or hold its waiter until `gate` is cancelled
    struct Scripted {
        flags: Flags,
        log: Log,
        gate: CancelToken,
    }

    impl Scripted {
        fn new(name: &'static str, log: Log, gate: CancelToken) -> Self {
            let schema = clap::Command::new(name)
                .arg(Arg::new("target").long("target"))
                .arg(Arg::new("env").long("env"))
                .arg(Arg::new("fail").long("fail").action(ArgAction::SetTrue))
                .arg(Arg::new("panic").long("panic").action(ArgAction::SetTrue))
                .arg(Arg::new("hold").long("hold").action(ArgAction::SetTrue));
            Self {
                flags: Flags::new(schema),
                log,
                gate,
            }
        }
    }

    impl Command for Scripted {
        fn flags(&self) -> &Flags {
            &self.flags
        }

        fn parse_args<'a>(&mut self, args: &'a [String]) -> Result<&'a [String], ChainError> {
            let rest = self.flags.parse(args)?;
            let consumed = &args[..args.len() - rest.len()];
            self.log
                .push(format!("parse:{}:{}", self.name(), consumed.join(" ")));
            Ok(rest)
        }

        fn run(&mut self, _cancel: &CancelToken) -> anyhow::Result<Option<Box<dyn Waiter>>> {
            self.log.push(format!("run:{}", self.name()));
            if self.flags.get_flag("fail") {
                bail!("scripted failure");
            }
            if self.flags.get_flag("panic") {
                panic!("scripted panic");
            }
            if self.flags.get_flag("hold") {
                let gate = self.gate.clone();
                let log = self.log.clone();
                let name = self.name().to_owned();
                let handle = thread::spawn(move || {
                    gate.wait();
                    log.push(format!("released:{name}"));
                });
                return Ok(Some(Box::new(handle)));
            }
            Ok(None)
        }
    }

    /// Returns a slice that does not end where its input ends
    struct Rogue {
        flags: Flags,
    }

    impl Command for Rogue {
        fn flags(&self) -> &Flags {
            &self.flags
        }

        fn parse_args<'a>(&mut self, args: &'a [String]) -> Result<&'a [String], ChainError> {
            Ok(&args[..args.len().min(1)])
        }

        fn run(&mut self, _cancel: &CancelToken) -> anyhow::Result<Option<Box<dyn Waiter>>> {
            Ok(None)
        }
    }

    struct Fixture {
        registry: Registry,
        log: Log,
        gate: CancelToken,
        created: Arc<AtomicUsize>,
    }

    impl Fixture {
        fn new(names: &[&'static str]) -> Self {
            let log = Log::default();
            let gate = CancelToken::new();
            let created = Arc::new(AtomicUsize::new(0));
            let mut registry = Registry::new();
            for &name in names {
                let log = log.clone();
                let gate = gate.clone();
                let created = Arc::clone(&created);
                registry.register(name, move || -> Box<dyn Command> {
                    created.fetch_add(1, Ordering::SeqCst);
                    Box::new(Scripted::new(name, log.clone(), gate.clone()))
                });
            }
            Self {
                registry,
                log,
                gate,
                created,
            }
        }

        fn dispatch(&self, args: &[&str]) -> Result<WaitGroup, ChainError> {
            self.dispatch_with(args, &[], ParseErrorPolicy::Abort, &CancelToken::new())
        }

        fn dispatch_with(
            &self,
            args: &[&str],
            defaults: &[&str],
            policy: ParseErrorPolicy,
            cancel: &CancelToken,
        ) -> Result<WaitGroup, ChainError> {
            Dispatcher::new(&self.registry)
                .with_parse_errors(policy)
                .dispatch(&tokens(args), &tokens(defaults), cancel)
        }
    }

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    fn finish(group: &WaitGroup) {
        assert!(
            group.wait_timeout(Duration::from_secs(5)),
            "commands did not finish"
        );
    }

    #[test]
    fn two_commands_are_parsed_and_launched_in_order() {
        let fixture = Fixture::new(&["build", "deploy"]);
        let group = fixture
            .dispatch(&["build", "--target=x", "deploy", "--env=prod"])
            .unwrap();
        finish(&group);

        assert_eq!(
            fixture.log.with_prefix("parse:"),
            vec!["parse:build:--target=x", "parse:deploy:--env=prod"]
        );
        let mut runs = fixture.log.with_prefix("run:");
        runs.sort();
        assert_eq!(runs, vec!["run:build", "run:deploy"]);
    }

    #[test]
    fn aggregate_waits_for_returned_waiters() {
        let fixture = Fixture::new(&["serve", "worker"]);
        let group = fixture.dispatch(&["serve", "--hold", "worker"]).unwrap();

        assert!(!group.wait_timeout(Duration::from_millis(100)));
        assert_eq!(group.pending(), 1);

        fixture.gate.cancel();
        finish(&group);
        assert_eq!(fixture.log.with_prefix("released:"), vec!["released:serve"]);
    }

    #[test]
    fn unknown_first_command_launches_nothing() {
        let fixture = Fixture::new(&["build"]);
        let cancel = CancelToken::new();
        let err = fixture
            .dispatch_with(&["frobnicate"], &[], ParseErrorPolicy::Abort, &cancel)
            .unwrap_err();

        assert!(matches!(&err, ChainError::UnknownCommand { name } if name == "frobnicate"));
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("frobnicate"));
        assert!(cancel.is_cancelled());
        assert_eq!(fixture.created.load(Ordering::SeqCst), 0);
        assert!(fixture.log.entries().is_empty());
    }

    #[test]
    fn unknown_later_command_cancels_the_run() {
        let fixture = Fixture::new(&["build"]);
        let cancel = CancelToken::new();
        let err = fixture
            .dispatch_with(&["build", "nope", "build"], &[], ParseErrorPolicy::Abort, &cancel)
            .unwrap_err();

        assert!(matches!(err, ChainError::UnknownCommand { ref name } if name == "nope"));
        assert!(cancel.is_cancelled());
        assert_eq!(fixture.created.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn defaults_replace_only_an_empty_line() {
        let fixture = Fixture::new(&["serve", "build"]);
        let cancel = CancelToken::new();

        let group = fixture
            .dispatch_with(&[], &["serve"], ParseErrorPolicy::Abort, &cancel)
            .unwrap();
        finish(&group);
        assert_eq!(fixture.log.with_prefix("run:"), vec!["run:serve"]);

        let group = fixture
            .dispatch_with(&["build"], &["serve"], ParseErrorPolicy::Abort, &cancel)
            .unwrap();
        finish(&group);
        assert_eq!(fixture.log.with_prefix("run:"), vec!["run:serve", "run:build"]);
    }

    #[test]
    fn empty_line_without_defaults_launches_nothing() {
        let fixture = Fixture::new(&["serve"]);
        let group = fixture.dispatch(&[]).unwrap();
        assert_eq!(group.pending(), 0);
        finish(&group);
        assert_eq!(fixture.created.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn default_with_immediately_complete_waiter() {
        struct Serve {
            flags: Flags,
        }

        impl Command for Serve {
            fn flags(&self) -> &Flags {
                &self.flags
            }

            fn parse_args<'a>(&mut self, args: &'a [String]) -> Result<&'a [String], ChainError> {
                self.flags.parse(args)
            }

            fn run(&mut self, _cancel: &CancelToken) -> anyhow::Result<Option<Box<dyn Waiter>>> {
                Ok(Some(Box::new(WaitGroup::new())))
            }
        }

        let registry = Registry::new().with("serve", || -> Box<dyn Command> {
            Box::new(Serve {
                flags: Flags::new(clap::Command::new("serve")),
            })
        });
        let group = Dispatcher::new(&registry)
            .dispatch(&[], &tokens(&["serve"]), &CancelToken::new())
            .unwrap();
        finish(&group);
    }

    #[test]
    fn runtime_error_does_not_affect_siblings() {
        let fixture = Fixture::new(&["build", "deploy"]);
        let cancel = CancelToken::new();
        let group = fixture
            .dispatch_with(&["build", "--fail", "deploy"], &[], ParseErrorPolicy::Abort, &cancel)
            .unwrap();
        finish(&group);

        let mut runs = fixture.log.with_prefix("run:");
        runs.sort();
        assert_eq!(runs, vec!["run:build", "run:deploy"]);
        assert!(!cancel.is_cancelled());
    }

    #[test]
    fn panicking_command_still_releases_its_unit() {
        let fixture = Fixture::new(&["build", "deploy"]);
        let group = fixture.dispatch(&["build", "--panic", "deploy"]).unwrap();
        finish(&group);
        assert_eq!(fixture.log.with_prefix("run:").len(), 2);
    }

    #[test]
    fn parse_error_aborts_by_default() {
        let fixture = Fixture::new(&["build", "deploy"]);
        let cancel = CancelToken::new();
        let err = fixture
            .dispatch_with(&["build", "--bogus", "deploy"], &[], ParseErrorPolicy::Abort, &cancel)
            .unwrap_err();

        assert!(matches!(&err, ChainError::Parse { command, .. } if command == "build"));
        assert_eq!(err.exit_code(), 3);
        assert!(cancel.is_cancelled());
        assert!(fixture.log.entries().is_empty());
    }

    #[test]
    fn parse_error_skip_keeps_earlier_commands() {
        let fixture = Fixture::new(&["build", "deploy"]);
        let cancel = CancelToken::new();
        let group = fixture
            .dispatch_with(
                &["deploy", "build", "--bogus", "deploy"],
                &[],
                ParseErrorPolicy::Skip,
                &cancel,
            )
            .unwrap();
        finish(&group);

        assert_eq!(fixture.log.with_prefix("run:"), vec!["run:deploy"]);
        assert_eq!(fixture.created.load(Ordering::SeqCst), 2);
        assert!(!cancel.is_cancelled());
    }

    #[test]
    fn missing_flag_value_is_a_parse_error() {
        let fixture = Fixture::new(&["build"]);
        let err = fixture.dispatch(&["build", "--target"]).unwrap_err();
        assert!(matches!(err, ChainError::Parse { .. }));
    }

    #[test]
    fn help_is_reported_separately() {
        let fixture = Fixture::new(&["build", "deploy"]);
        let err = fixture.dispatch(&["build", "--help", "deploy"]).unwrap_err();

        match err {
            ChainError::HelpRequested { command, text } => {
                assert_eq!(command, "build");
                assert!(text.contains("--target"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn every_token_is_seen_by_exactly_one_command() {
        let fixture = Fixture::new(&["build", "deploy", "serve"]);
        let line = [
            "build", "--target", "a", "deploy", "--env=prod", "--fail", "serve", "build", "--",
            "deploy",
        ];
        let group = fixture.dispatch(&line).unwrap();
        finish(&group);

        let parses = fixture.log.with_prefix("parse:");
        assert_eq!(
            parses,
            vec![
                "parse:build:--target a",
                "parse:deploy:--env=prod --fail",
                "parse:serve:",
                "parse:build:--",
                "parse:deploy:",
            ]
        );
        assert_eq!(fixture.created.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn same_name_twice_gets_fresh_instances() {
        let fixture = Fixture::new(&["build"]);
        let group = fixture
            .dispatch(&["build", "--target=a", "build", "--target=b"])
            .unwrap();
        finish(&group);

        assert_eq!(fixture.created.load(Ordering::SeqCst), 2);
        assert_eq!(
            fixture.log.with_prefix("parse:"),
            vec!["parse:build:--target=a", "parse:build:--target=b"]
        );
    }

    #[test]
    fn remainder_must_be_a_suffix() {
        let registry = Registry::new().with("rogue", || -> Box<dyn Command> {
            Box::new(Rogue {
                flags: Flags::new(clap::Command::new("rogue")),
            })
        });
        let err = Dispatcher::new(&registry)
            .dispatch(&tokens(&["rogue", "a", "b"]), &[], &CancelToken::new())
            .unwrap_err();

        assert!(matches!(&err, ChainError::Parse { command, message }
            if command == "rogue" && message.contains("suffix")));
    }

    #[test]
    fn dispatch_reads_process_arguments() {
        let fixture = Fixture::new(&["build", "serve"]);
        let system = MockSystem::new()
            .with_args(["cmdchain", "build", "--target=x"])
            .unwrap();
        let group = cmdchain::dispatch_from_system(
            &system,
            &fixture.registry,
            &tokens(&["serve"]),
            &CancelToken::new(),
        )
        .unwrap();
        finish(&group);
        assert_eq!(fixture.log.with_prefix("run:"), vec!["run:build"]);

        let bare = MockSystem::new();
        let group = cmdchain::dispatch_from_system(
            &bare,
            &fixture.registry,
            &tokens(&["serve"]),
            &CancelToken::new(),
        )
        .unwrap();
        finish(&group);
        assert_eq!(fixture.log.with_prefix("run:"), vec!["run:build", "run:serve"]);
    }
}
