//! Category derivation from folder layout and content patterns.
//!
//! Two independent sources produce a label: the folders between the
//! configured base path and the file, and an ordered table of vocabulary
//! patterns matched against the path and text. [`CatalogConfig::prefer_folder`]
//! decides which source wins; [`FALLBACK_CATEGORY`] is used when neither
//! yields anything.

use std::sync::LazyLock;

use regex::Regex;
use script_catalog_core::FALLBACK_CATEGORY;

use crate::config::CatalogConfig;

/// Separator placed between folder segments of a category.
pub const CATEGORY_SEPARATOR: &str = " / ";

/// Ordered `(vocabulary, label)` table. The first matching row wins, so rows
/// with overlapping vocabulary shadow later ones (`Snapshot` resolves to
/// Virtualization, never Backup and DR).
pub const CATEGORY_RULES: &[(&str, &str)] = &[
    (
        "M365|O365|Office365|ExchangeOnline|SharePointOnline|OneDrive|Teams|Outlook|Planner|PowerPlatform|PowerApps|PowerAutomate",
        "Microsoft 365",
    ),
    (
        "ActiveDirectory|ADFS|ADDS|DomainController|SAMAccount|Kerberos|LDAP|AAD|AzureAD|EntraID",
        "Identity",
    ),
    (
        "Security|SecPol|ACL|Permissions|Credential|Secrets|PKI|Certificate|TLS|SSL|Firewall|Malware|Virus|Defender|AppLocker|BitLocker|Encryption",
        "Security",
    ),
    (
        "Intune|SCCM|ConfigMgr|EndpointManager|MDM|GPO|GroupPolicy",
        "Endpoint Mgmt",
    ),
    (
        "Azure|ARM|ResourceGroup|VMSS|AKS|AppService|KeyVault|StorageAccount|CosmosDB|LogicApp|FunctionApp|VNet|NSG",
        "Azure",
    ),
    (
        "Jira|Confluence|DevOps|Agile|Scrum|Kanban|Trello|Asana",
        "Dev/Work Mgmt",
    ),
    (
        "Hyper-V|VMware|vSphere|ESXi|VirtualBox|VHDX?|Snapshot|Checkpoint",
        "Virtualization",
    ),
    (
        "Docker|Podman|Containerd|K8s|Kubernetes|Helm|Image|Container",
        "Containers",
    ),
    (
        "DevOps|Terraform|Ansible|Chef|Puppet|Bicep|ARMTemplate|CI/CD|Pipeline|Jenkins|Octopus",
        "DevOps/IaC",
    ),
    (
        "SQLServer|MSSQL|Postgres|PostgreSQL|MySQL|MariaDB|OracleDB|MongoDB|Redis|Database|SQLite",
        "Databases",
    ),
    (
        "OAuth|OIDC|SAML|JWT|FIDO2|MFA|2FA|SSO|AuthN|AuthZ",
        "Auth Standards",
    ),
    (
        "AWS|AmazonWebServices|EC2|S3|GCP|GoogleCloud|BigQuery|CloudRun",
        "Cloud Vendors",
    ),
    (
        "Network|NetCfg|DNS|DHCP|IPConfig|Ping|Traceroute|Subnet|Routing|Switch|Router|WiFi|NAT|Port|TCP|UDP|SSLVPN|VPN",
        "Networking",
    ),
    (
        "PowerShell|Bash|Python|CSharp|C#|JavaScript|TypeScript|GoLang?|Rust|Perl|Ruby",
        "Languages",
    ),
    (
        "Backup|Restore|Recovery|Snapshot|Replication|Failover|DisasterRecovery|DR|Veeam",
        "Backup and DR",
    ),
    (
        "Exchange|SMTP|IMAP|POP3|Mailbox|MailFlow|SendMail",
        "Email",
    ),
    (
        "Help|Get-Help|About_|Info|Discover|WhatIf",
        "Help/Discovery",
    ),
    (
        "Process|Tasklist|Taskkill|Get-Process|ProcMon|Handle",
        "Processes",
    ),
    (
        "Service|Get-Service|Set-Service|Start-Service|Stop-Service|Restart-Service",
        "Services",
    ),
    (
        "File|Folder|Directory|Path|Copy-Item|Move-Item|Remove-Item|Rename-Item|New-Item|Get-ChildItem|Tree",
        "Files/Directories",
    ),
    (
        "Registry|RegKey|HKLM|HKCU|HKCR|HKU|HKCC|Get-ItemProperty|Set-ItemProperty",
        "Registry",
    ),
    (
        "EventLog|Get-EventLog|Get-WinEvent|LogName|ApplicationLog|SystemLog|Audit",
        "Events/Logs",
    ),
    (
        "Device|PnP|Driver|Hardware|Disk|Volume|Partition|USB|PrinterPort|Monitor|Battery|Adapter",
        "Hardware/Devices",
    ),
    (
        "Print|Printer|PrintJob|Spooler|PrintQueue",
        "Printing",
    ),
    (
        r"Update|Patch|WUInstall|WindowsUpdate|KB\d+",
        "Updates",
    ),
    (
        "User|Group|LocalUser|LocalGroup|Account|SID|Profile|Credential|NTUser",
        "Users/Groups",
    ),
    (
        "PerfMon|Performance|Counter|ResourceMonitor|CPU|Memory|DiskIO|Latency|Benchmark",
        "Performance",
    ),
    (
        "PowerPlan|Battery|Sleep|Hibernate|Shutdown|Restart|Reboot|UPS",
        "Power",
    ),
    (
        "Display|Resolution|Monitor|Screen|Graphics|DPI|Color|Brightness",
        "Display",
    ),
    (
        "Keyboard|Mouse|Input|HID|Touchpad|Tablet|Pen",
        "Input",
    ),
    (
        "Audio|Sound|Speaker|Microphone|Mute|Volume",
        "Audio",
    ),
    (
        "Troubleshoot|Diag|Diagnosis|Fix|Repair|Checkup|Health|SFC|DISM",
        "Troubleshooting",
    ),
    (
        "Install|Setup|Deployment|Sysprep|ImageX|WIM|ISO|Provisioning",
        "Installation",
    ),
    (
        "Recovery|WinRE|Reset|RestorePoint|SystemRestore|BootRepair",
        "Recovery",
    ),
    (
        "Util|Utility|Tool|Script|Helper|AdminTool|Sysinternals",
        "Utilities",
    ),
];

static COMPILED_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    CATEGORY_RULES
        .iter()
        .map(|(vocabulary, label)| {
            let pattern = format!(r"(?i)\b(?:{vocabulary})\b");
            (
                Regex::new(&pattern).expect("static regex must compile"),
                *label,
            )
        })
        .collect()
});

/// Derives the category of a script.
///
/// With `prefer_folder` the folder category wins over the pattern table;
/// without it the order is reversed. Falls back to [`FALLBACK_CATEGORY`].
pub fn derive_category(config: &CatalogConfig, path: &str, text: Option<&str>) -> String {
    let folder = folder_category(config, path);
    let pattern = pattern_category(path, text.unwrap_or_default());

    let (first, second) = if config.prefer_folder {
        (Some(folder.as_str()).filter(|s| !s.is_empty()), pattern)
    } else {
        (pattern, Some(folder.as_str()).filter(|s| !s.is_empty()))
    };

    first.or(second).unwrap_or(FALLBACK_CATEGORY).to_string()
}

/// Joins the leading non-ignored folders between the base path and the file
/// name, at most `category_depth` of them. Empty when none remain.
pub fn folder_category(config: &CatalogConfig, path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();
    let Some((_file_name, folders)) = segments.split_last() else {
        return String::new();
    };

    let base: Vec<&str> = config
        .base_path
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    let relative = strip_base(folders, &base);

    relative
        .iter()
        .filter(|segment| !config.is_ignored(segment))
        .take(config.category_depth)
        .copied()
        .collect::<Vec<_>>()
        .join(CATEGORY_SEPARATOR)
}

/// Returns the folders after the first case-insensitive occurrence of the
/// base path, or all folders when the base does not occur.
fn strip_base<'a, 'b>(folders: &'a [&'b str], base: &[&str]) -> &'a [&'b str] {
    if base.is_empty() || base.len() > folders.len() {
        return folders;
    }

    folders
        .windows(base.len())
        .position(|window| {
            window
                .iter()
                .zip(base)
                .all(|(segment, expected)| segment.eq_ignore_ascii_case(expected))
        })
        .map_or(folders, |start| &folders[start + base.len()..])
}

/// Returns the label of the first table row whose vocabulary occurs in the
/// path or text.
pub fn pattern_category(path: &str, text: &str) -> Option<&'static str> {
    let probe = format!("{path}\n{text}");
    COMPILED_RULES
        .iter()
        .find(|(regex, _)| regex.is_match(&probe))
        .map(|(_, label)| *label)
}
