//! Sample log texts shared by the extractor tests.

/// Accounting log of a job that ran once and terminated normally.
pub const SINGLE_RUN_LOG: &str = concat!(
    "000 (4242.000.000) 2023-10-12 10:15:01 Job submitted from host: <10.3.0.12:9618?addrs=10.3.0.12-9618&alias=submit.example.org>\n",
    "...\n",
    "001 (4242.000.000) 2023-10-12 10:15:40 Job executing on host: <10.3.0.57:9618?addrs=10.3.0.57-9618&alias=node57.example.org>\n",
    "...\n",
    "006 (4242.000.000) 2023-10-12 10:20:41 Image size of job updated: 2048000\n",
    "\t1964  -  MemoryUsage of job (MB)\n",
    "\t2010752  -  ResidentSetSize of job (KB)\n",
    "...\n",
    "005 (4242.000.000) 2023-10-12 10:31:12 Job terminated.\n",
    "\t(1) Normal termination (return value 0)\n",
    "\t\tUsr 0 00:14:51, Sys 0 00:00:22  -  Run Remote Usage\n",
    "\t\tUsr 0 00:00:03, Sys 0 00:00:01  -  Run Local Usage\n",
    "\t\tUsr 0 00:20:10, Sys 0 00:00:40  -  Total Remote Usage\n",
    "\t\tUsr 0 00:00:05, Sys 0 00:00:02  -  Total Local Usage\n",
    "\t0  -  Run Bytes Sent By Job\n",
    "\t12345  -  Run Bytes Received By Job\n",
    "\t0  -  Total Bytes Sent By Job\n",
    "\t12345  -  Total Bytes Received By Job\n",
    "\tPartitionable Resources :    Usage  Request Allocated\n",
    "\t   Cpus                 :     0.98        1         1\n",
    "\t   Disk (KB)            :    35         100   1048576\n",
    "\t   Memory (MB)          :  1964        4096      4096\n",
    "...\n",
);

/// Accounting log of a job that terminated, was resubmitted and ran again.
pub const RERUN_LOG: &str = concat!(
    "001 (77.000.000) 2023-10-12 09:00:00 Job executing on host: <10.3.0.41:9618>\n",
    "...\n",
    "005 (77.000.000) 2023-10-12 09:05:12 Job terminated.\n",
    "\t(1) Normal termination (return value 1)\n",
    "\t\tUsr 0 00:05:00, Sys 0 00:00:10  -  Run Remote Usage\n",
    "\t\tUsr 0 00:00:01, Sys 0 00:00:01  -  Run Local Usage\n",
    "\t\tUsr 0 00:05:00, Sys 0 00:00:10  -  Total Remote Usage\n",
    "\t\tUsr 0 00:00:01, Sys 0 00:00:01  -  Total Local Usage\n",
    "\tPartitionable Resources :    Usage  Request Allocated\n",
    "\t   Cpus                 :     1.00        1         1\n",
    "\t   Disk (KB)            :    20         100   1048576\n",
    "\t   Memory (MB)          :  1024        4096      4096\n",
    "...\n",
    "001 (77.000.000) 2023-10-12 09:30:00 Job executing on host: <10.3.0.57:9618>\n",
    "...\n",
    "005 (77.000.000) 2023-10-12 09:44:51 Job terminated.\n",
    "\t(1) Normal termination (return value 0)\n",
    "\t\tUsr 0 00:14:51, Sys 0 00:00:22  -  Run Remote Usage\n",
    "\t\tUsr 0 00:00:03, Sys 0 00:00:01  -  Run Local Usage\n",
    "\t\tUsr 0 00:20:10, Sys 0 00:00:40  -  Total Remote Usage\n",
    "\t\tUsr 0 00:00:05, Sys 0 00:00:02  -  Total Local Usage\n",
    "\tPartitionable Resources :    Usage  Request Allocated\n",
    "\t   Cpus                 :     0.98        1         1\n",
    "\t   Disk (KB)            :    35         100   1048576\n",
    "\t   Memory (MB)          :  1964        4096      4096\n",
    "...\n",
);

/// Status log with a version block, repeated warnings and one error.
pub const STATUS_LOG: &str = concat!(
    "2023-10-12 10:15:41,101 - JUNIFER - INFO - ===== Lib Versions =====\n",
    "2023-10-12 10:15:41,102 - JUNIFER - INFO - numpy: 1.26.0\n",
    "2023-10-12 10:15:41,103 - JUNIFER - INFO - pandas: 2.1.1\n",
    "2023-10-12 10:15:41,104 - JUNIFER - INFO - junifer: 0.0.4\n",
    "2023-10-12 10:15:41,105 - JUNIFER - INFO - ========================\n",
    "2023-10-12 10:15:41,230 - JUNIFER - INFO - Running marker\n",
    "2023-10-12 10:15:42,001 - JUNIFER - WARNING - Mask not found, using default\n",
    "2023-10-12 10:15:43,002 - JUNIFER - WARNING - Mask not found, using default\n",
    "2023-10-12 10:15:44,003 - JUNIFER - WARNING - Low number of voxels\n",
    "2023-10-12 10:15:45,004 - JUNIFER - ERROR - Storage not writable\n",
    "2023-10-12 10:15:45,004 - JUNIFER - ERROR - Storage not writable\n",
);
